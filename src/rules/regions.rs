//! Jurisdiction markers.
//!
//! Detection feeds the informational `REGION_SPECIFIC` flag and the `regions` field of a
//! verdict. Neither affects approval.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::hashing::normalize_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    Us,
    Uk,
    Eu,
    Australia,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::Us, Region::Uk, Region::Eu, Region::Australia];

    pub fn code(&self) -> &'static str {
        match self {
            Region::Us => "US",
            Region::Uk => "UK",
            Region::Eu => "EU",
            Region::Australia => "AUSTRALIA",
        }
    }

    fn markers(&self) -> &'static [&'static str] {
        match self {
            Region::Us => &[
                "united states",
                "usa",
                "us waters",
                "uscg",
                "federal waters",
                "continental shelf",
            ],
            Region::Uk => &[
                "united kingdom",
                "uk waters",
                "uk flag",
                "crown dependencies",
            ],
            Region::Eu => &["european", "eu waters", "european union"],
            Region::Australia => &["australia", "australian", "great barrier"],
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

static REGION_PHRASES: LazyLock<Vec<(Region, Vec<String>)>> = LazyLock::new(|| {
    Region::ALL
        .into_iter()
        .map(|region| {
            let phrases = region
                .markers()
                .iter()
                .map(|m| format!(" {} ", normalize_text(m)))
                .collect();
            (region, phrases)
        })
        .collect()
});

/// Regions named anywhere in the question or answer.
pub fn detect_regions(question: &str, answer: &str) -> BTreeSet<Region> {
    detect_regions_normalized(&normalize_text(question), &normalize_text(answer))
}

/// [`detect_regions`] for text that has already been through [`normalize_text`].
pub fn detect_regions_normalized(question: &str, answer: &str) -> BTreeSet<Region> {
    let padded = format!(" {question} {answer} ");
    REGION_PHRASES
        .iter()
        .filter(|(_, phrases)| phrases.iter().any(|p| padded.contains(p.as_str())))
        .map(|(region, _)| *region)
        .collect()
}
