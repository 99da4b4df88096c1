use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a flag feeds into the approval decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Rejects the candidate on its own.
    Fatal,
    /// Counts toward the soft-flag threshold.
    Soft,
    /// Reported only; never affects approval.
    Info,
}

/// Quality issue codes raised by the rule engine.
///
/// Declaration order is rejection priority: when several flags could explain a rejection, the
/// earliest variant wins. Fatal flags come first, informational flags last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityFlag {
    DuplicateExact,
    EmptyContent,
    LowConfidence,
    LegalAdvice,
    DuplicateQuestion,
    NearDuplicate,
    TooShort,
    LowEntityConfidence,
    NoEntities,
    UnclearQuestion,
    MarketingTone,
    DuplicateAnswer,
    TooLong,
    RegionSpecific,
}

impl QualityFlag {
    pub const ALL: [QualityFlag; 14] = [
        QualityFlag::DuplicateExact,
        QualityFlag::EmptyContent,
        QualityFlag::LowConfidence,
        QualityFlag::LegalAdvice,
        QualityFlag::DuplicateQuestion,
        QualityFlag::NearDuplicate,
        QualityFlag::TooShort,
        QualityFlag::LowEntityConfidence,
        QualityFlag::NoEntities,
        QualityFlag::UnclearQuestion,
        QualityFlag::MarketingTone,
        QualityFlag::DuplicateAnswer,
        QualityFlag::TooLong,
        QualityFlag::RegionSpecific,
    ];

    #[inline]
    pub fn severity(&self) -> Severity {
        match self {
            QualityFlag::DuplicateExact
            | QualityFlag::EmptyContent
            | QualityFlag::LowConfidence
            | QualityFlag::LegalAdvice => Severity::Fatal,
            QualityFlag::RegionSpecific => Severity::Info,
            _ => Severity::Soft,
        }
    }

    #[inline]
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    #[inline]
    pub fn is_soft(&self) -> bool {
        self.severity() == Severity::Soft
    }

    /// Rejection priority; lower wins.
    #[inline]
    pub fn priority(&self) -> u8 {
        *self as u8
    }

    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            QualityFlag::DuplicateExact => "DUPLICATE_EXACT",
            QualityFlag::EmptyContent => "EMPTY_CONTENT",
            QualityFlag::LowConfidence => "LOW_CONFIDENCE",
            QualityFlag::LegalAdvice => "LEGAL_ADVICE",
            QualityFlag::DuplicateQuestion => "DUPLICATE_QUESTION",
            QualityFlag::NearDuplicate => "NEAR_DUPLICATE",
            QualityFlag::TooShort => "TOO_SHORT",
            QualityFlag::LowEntityConfidence => "LOW_ENTITY_CONFIDENCE",
            QualityFlag::NoEntities => "NO_ENTITIES",
            QualityFlag::UnclearQuestion => "UNCLEAR_QUESTION",
            QualityFlag::MarketingTone => "MARKETING_TONE",
            QualityFlag::DuplicateAnswer => "DUPLICATE_ANSWER",
            QualityFlag::TooLong => "TOO_LONG",
            QualityFlag::RegionSpecific => "REGION_SPECIFIC",
        }
    }

    /// Points subtracted by [`ValidatedCandidate::quality_score`](crate::candidate::ValidatedCandidate::quality_score).
    pub fn score_penalty(&self) -> u8 {
        match self {
            QualityFlag::DuplicateExact | QualityFlag::EmptyContent | QualityFlag::LegalAdvice => {
                100
            }
            QualityFlag::UnclearQuestion => 30,
            QualityFlag::TooShort => 25,
            QualityFlag::LowConfidence => 20,
            QualityFlag::DuplicateQuestion => 20,
            QualityFlag::MarketingTone => 15,
            QualityFlag::NearDuplicate => 15,
            QualityFlag::TooLong => 10,
            QualityFlag::NoEntities
            | QualityFlag::LowEntityConfidence
            | QualityFlag::DuplicateAnswer => 5,
            QualityFlag::RegionSpecific => 0,
        }
    }
}

impl fmt::Display for QualityFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for QualityFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.code() == s)
            .ok_or_else(|| format!("unknown quality flag: {}", s))
    }
}
