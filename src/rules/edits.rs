//! Reviewer-facing rewrite suggestions for flagged verdicts.
//!
//! Suggestions are advisory. Nothing here feeds back into the approval decision.

use serde::Serialize;

use super::checks::has_marketing_phrase;
use super::flags::QualityFlag;
use crate::candidate::ValidatedCandidate;

/// Longest sentence [`normalize_answer`] keeps before splitting, in words.
const MAX_SENTENCE_WORDS: usize = 15;

/// Closing boilerplate; everything from the lead to the end of its line is dropped.
const FLUFF_LEADS: &[&str] = &[
    "for more information",
    "if you have questions",
    "feel free to",
    "don't hesitate to",
    "don\u{2019}t hesitate to",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestedEdits {
    pub question: String,
    pub answer: String,
    /// One line per applied rewrite, in the order they were applied.
    pub improvements: Vec<String>,
}

impl SuggestedEdits {
    pub fn is_empty(&self) -> bool {
        self.improvements.is_empty()
    }
}

fn strip_fluff(line: &str) -> &str {
    let lower = line.to_ascii_lowercase();
    let cut = FLUFF_LEADS
        .iter()
        .filter_map(|lead| lower.find(lead))
        .min()
        .unwrap_or(line.len());
    &line[..cut]
}

fn push_sentence(out: &mut Vec<String>, words: &[&str]) {
    out.push(format!("{}.", words.join(" ")));
}

/// Rewrites an answer into plain declarative sentences.
///
/// Closing boilerplate and sentences with promotional phrasing are removed. Sentences longer
/// than 15 words are split into 15-word pieces, and every sentence ends with a period.
pub fn normalize_answer(answer: &str) -> String {
    let stripped: Vec<&str> = answer.lines().map(strip_fluff).collect();
    let text = stripped.join(" ");

    let mut sentences = Vec::new();
    for sentence in text.split(['.', '!', '?']) {
        if has_marketing_phrase(sentence) {
            continue;
        }
        let words: Vec<&str> = sentence.split_whitespace().collect();
        for chunk in words.chunks(MAX_SENTENCE_WORDS) {
            push_sentence(&mut sentences, chunk);
        }
    }

    sentences.join(" ")
}

/// Suggests rewrites for the issues a verdict was flagged with.
///
/// - `MARKETING_TONE`: the answer goes through [`normalize_answer`].
/// - A question not ending in `?` is given one.
/// - Regional content without a region tag in the answer gets the first region appended to
///   the question, as in `What is the speed limit (UK)?`.
pub fn suggest_edits(verdict: &ValidatedCandidate) -> SuggestedEdits {
    let mut improvements = Vec::new();
    let mut question = verdict.question().trim().to_string();
    let mut answer = verdict.answer().to_string();

    if verdict.has_flag(QualityFlag::MarketingTone) {
        answer = normalize_answer(&answer);
        improvements.push("Removed marketing language".to_string());
    }

    if !question.is_empty() && !question.ends_with('?') {
        question = format!("{}?", question.trim_end_matches(['?', '!']).trim_end());
        improvements.push("Standardized question format".to_string());
    }

    if let Some(first) = verdict.regions().first() {
        let tag = format!("({first})");
        if !question.is_empty() && !answer.contains(&tag) {
            question = format!("{} {tag}?", question.trim_end_matches('?').trim_end());
            let names: Vec<&str> = verdict.regions().iter().map(|r| r.code()).collect();
            improvements.push(format!("Added regional context: {}", names.join(", ")));
        }
    }

    SuggestedEdits {
        question,
        answer,
        improvements,
    }
}
