//! Built-in quality checks.
//!
//! Each check looks at one [`CheckContext`] and returns the flags it raises. Checks never see
//! each other's output, so their order in the engine does not change the result.

use std::sync::LazyLock;

use super::engine::CheckContext;
use super::flags::QualityFlag;
use super::regions::detect_regions_normalized;
use crate::hashing::normalize_text;

const MARKETING_TERMS: &[&str] = &[
    "award-winning",
    "state-of-the-art",
    "cutting-edge",
    "revolutionary",
    "industry-leading",
    "our experts",
    "top rated",
    "highly recommended",
    "click here",
    "learn more",
    "contact us",
    "call now",
    "get a quote",
    "call today",
    "free quote",
    "special offer",
    "limited time",
    "buy now",
];

const LEGAL_ADVICE_TERMS: &[&str] = &[
    "should consult",
    "should contact",
    "must consult",
    "legal advice",
    "consult an attorney",
    "talk to a lawyer",
    "seek legal counsel",
    "we are not lawyers",
    "not a substitute",
];

static MARKETING_PHRASES: LazyLock<Vec<String>> = LazyLock::new(|| padded(MARKETING_TERMS));
static LEGAL_ADVICE_PHRASES: LazyLock<Vec<String>> = LazyLock::new(|| padded(LEGAL_ADVICE_TERMS));

/// Normalized phrases wrapped in spaces so matching respects word boundaries.
fn padded(terms: &[&str]) -> Vec<String> {
    terms
        .iter()
        .map(|t| format!(" {} ", normalize_text(t)))
        .collect()
}

fn contains_phrase(padded_text: &str, phrases: &[String]) -> bool {
    phrases.iter().any(|p| padded_text.contains(p.as_str()))
}

/// Whether raw `text` contains a marketing phrase.
pub(crate) fn has_marketing_phrase(text: &str) -> bool {
    contains_phrase(&format!(" {} ", normalize_text(text)), &MARKETING_PHRASES)
}

/// `EMPTY_CONTENT`: question or answer normalizes to nothing.
pub fn empty_content(ctx: &CheckContext<'_>) -> Vec<QualityFlag> {
    if ctx.question_tokens() == 0 || ctx.answer_tokens() == 0 {
        vec![QualityFlag::EmptyContent]
    } else {
        Vec::new()
    }
}

/// `LOW_CONFIDENCE`: below the extraction method's prior.
pub fn confidence(ctx: &CheckContext<'_>) -> Vec<QualityFlag> {
    let candidate = ctx.candidate();
    if candidate.confidence < ctx.config().min_confidence(candidate.extraction_method) {
        vec![QualityFlag::LowConfidence]
    } else {
        Vec::new()
    }
}

/// `TOO_SHORT` / `TOO_LONG`. An empty answer is left to [`empty_content`].
pub fn answer_length(ctx: &CheckContext<'_>) -> Vec<QualityFlag> {
    let tokens = ctx.answer_tokens();
    let config = ctx.config();

    if tokens == 0 {
        Vec::new()
    } else if tokens < config.min_answer_tokens {
        vec![QualityFlag::TooShort]
    } else if tokens > config.max_answer_tokens {
        vec![QualityFlag::TooLong]
    } else {
        Vec::new()
    }
}

/// `NO_ENTITIES` for methods expected to yield entities; `LOW_ENTITY_CONFIDENCE` for any weak
/// entity.
pub fn entity_coverage(ctx: &CheckContext<'_>) -> Vec<QualityFlag> {
    let candidate = ctx.candidate();
    let mut flags = Vec::new();

    if candidate.entities.is_empty() && candidate.extraction_method.expects_entities() {
        flags.push(QualityFlag::NoEntities);
    }

    let floor = ctx.config().min_entity_confidence;
    if candidate.entities.iter().any(|e| e.confidence < floor) {
        flags.push(QualityFlag::LowEntityConfidence);
    }

    flags
}

/// Maps the duplicate index result onto flags.
pub fn duplicates(ctx: &CheckContext<'_>) -> Vec<QualityFlag> {
    let lookup = ctx.lookup();

    if lookup.is_exact() {
        return vec![QualityFlag::DuplicateExact];
    }

    let mut flags = Vec::new();
    if lookup.duplicate_question {
        flags.push(QualityFlag::DuplicateQuestion);
    } else if lookup.near_duplicate_of.is_some() {
        flags.push(QualityFlag::NearDuplicate);
    }
    if lookup.duplicate_answer {
        flags.push(QualityFlag::DuplicateAnswer);
    }
    flags
}

/// `LEGAL_ADVICE`: answer reads as (or disclaims) legal advice.
pub fn legal_advice(ctx: &CheckContext<'_>) -> Vec<QualityFlag> {
    let answer = format!(" {} ", ctx.normalized_answer());
    if contains_phrase(&answer, &LEGAL_ADVICE_PHRASES) {
        vec![QualityFlag::LegalAdvice]
    } else {
        Vec::new()
    }
}

/// `MARKETING_TONE`: promotional phrasing in the answer.
pub fn marketing_tone(ctx: &CheckContext<'_>) -> Vec<QualityFlag> {
    let answer = format!(" {} ", ctx.normalized_answer());
    if contains_phrase(&answer, &MARKETING_PHRASES) {
        vec![QualityFlag::MarketingTone]
    } else {
        Vec::new()
    }
}

/// `UNCLEAR_QUESTION`: a non-empty question that is not phrased as one.
pub fn question_form(ctx: &CheckContext<'_>) -> Vec<QualityFlag> {
    let question = ctx.candidate().question.trim_end();
    if ctx.question_tokens() > 0 && !question.ends_with(['?', '\u{FF1F}']) {
        vec![QualityFlag::UnclearQuestion]
    } else {
        Vec::new()
    }
}

/// `REGION_SPECIFIC`: the pair names a jurisdiction.
pub fn region_specific(ctx: &CheckContext<'_>) -> Vec<QualityFlag> {
    if detect_regions_normalized(ctx.normalized_question(), ctx.normalized_answer()).is_empty() {
        Vec::new()
    } else {
        vec![QualityFlag::RegionSpecific]
    }
}
