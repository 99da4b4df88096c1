use std::collections::BTreeSet;

use tracing::debug;

use super::checks;
use super::config::RuleConfig;
use super::flags::QualityFlag;
use crate::candidate::QACandidate;
use crate::hashing::normalize_text;
use crate::index::DuplicateLookup;

/// Everything a check may read: the candidate, the duplicate lookup and thresholds.
///
/// Normalized text and token counts are computed once per candidate.
#[derive(Debug)]
pub struct CheckContext<'a> {
    candidate: &'a QACandidate,
    lookup: &'a DuplicateLookup,
    config: &'a RuleConfig,
    normalized_question: String,
    normalized_answer: String,
    question_tokens: usize,
    answer_tokens: usize,
}

fn count_tokens(normalized: &str) -> usize {
    normalized.split(' ').filter(|t| !t.is_empty()).count()
}

impl<'a> CheckContext<'a> {
    pub fn new(
        candidate: &'a QACandidate,
        lookup: &'a DuplicateLookup,
        config: &'a RuleConfig,
    ) -> Self {
        let normalized_question = normalize_text(&candidate.question);
        let normalized_answer = normalize_text(&candidate.answer);
        Self {
            candidate,
            lookup,
            config,
            question_tokens: count_tokens(&normalized_question),
            answer_tokens: count_tokens(&normalized_answer),
            normalized_question,
            normalized_answer,
        }
    }

    #[inline]
    pub fn candidate(&self) -> &QACandidate {
        self.candidate
    }

    #[inline]
    pub fn lookup(&self) -> &DuplicateLookup {
        self.lookup
    }

    #[inline]
    pub fn config(&self) -> &RuleConfig {
        self.config
    }

    #[inline]
    pub fn normalized_question(&self) -> &str {
        &self.normalized_question
    }

    #[inline]
    pub fn normalized_answer(&self) -> &str {
        &self.normalized_answer
    }

    #[inline]
    pub fn question_tokens(&self) -> usize {
        self.question_tokens
    }

    #[inline]
    pub fn answer_tokens(&self) -> usize {
        self.answer_tokens
    }
}

/// One independent, pure quality check.
pub trait QualityCheck: Send + Sync {
    fn name(&self) -> &'static str;

    fn check(&self, ctx: &CheckContext<'_>) -> Vec<QualityFlag>;
}

/// Adapts a plain function or closure into a [`QualityCheck`].
pub struct FnCheck<F> {
    name: &'static str,
    f: F,
}

impl<F> FnCheck<F>
where
    F: Fn(&CheckContext<'_>) -> Vec<QualityFlag> + Send + Sync,
{
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

impl<F> QualityCheck for FnCheck<F>
where
    F: Fn(&CheckContext<'_>) -> Vec<QualityFlag> + Send + Sync,
{
    #[inline]
    fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    fn check(&self, ctx: &CheckContext<'_>) -> Vec<QualityFlag> {
        (self.f)(ctx)
    }
}

/// Ordered registry of checks. Runs all of them and unions the flags.
pub struct RuleEngine {
    checks: Vec<Box<dyn QualityCheck>>,
    config: RuleConfig,
}

impl RuleEngine {
    /// Engine with every built-in check registered.
    pub fn new(config: RuleConfig) -> Self {
        Self::empty(config)
            .with_check(FnCheck::new("empty_content", checks::empty_content))
            .with_check(FnCheck::new("confidence", checks::confidence))
            .with_check(FnCheck::new("answer_length", checks::answer_length))
            .with_check(FnCheck::new("entity_coverage", checks::entity_coverage))
            .with_check(FnCheck::new("duplicates", checks::duplicates))
            .with_check(FnCheck::new("legal_advice", checks::legal_advice))
            .with_check(FnCheck::new("marketing_tone", checks::marketing_tone))
            .with_check(FnCheck::new("question_form", checks::question_form))
            .with_check(FnCheck::new("region_specific", checks::region_specific))
    }

    /// Engine with no checks; every candidate comes out clean.
    pub fn empty(config: RuleConfig) -> Self {
        Self {
            checks: Vec::new(),
            config,
        }
    }

    pub fn with_check(mut self, check: impl QualityCheck + 'static) -> Self {
        self.register(check);
        self
    }

    /// Appends a check to the end of the list.
    pub fn register(&mut self, check: impl QualityCheck + 'static) {
        self.checks.push(Box::new(check));
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Runs every check against `candidate` and returns the union of raised flags.
    pub fn evaluate(&self, candidate: &QACandidate, lookup: &DuplicateLookup) -> BTreeSet<QualityFlag> {
        let ctx = CheckContext::new(candidate, lookup, &self.config);
        let mut flags = BTreeSet::new();

        for check in &self.checks {
            let raised = check.check(&ctx);
            if !raised.is_empty() {
                debug!(check = check.name(), flags = ?raised, "Check raised flags");
            }
            flags.extend(raised);
        }

        flags
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(RuleConfig::default())
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("checks", &self.check_names())
            .field("config", &self.config)
            .finish()
    }
}
