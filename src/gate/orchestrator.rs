//! Gate orchestration: fingerprint -> duplicate index -> rule engine -> verdict.

use std::collections::BTreeSet;

use tracing::{debug, instrument, warn};

use super::config::GateConfig;
use super::error::GateResult;
use crate::candidate::{QACandidate, ValidatedCandidate};
use crate::index::{DuplicateIndex, Sighting};
use crate::rules::{QualityFlag, RuleEngine, detect_regions};

/// Picks the single dominant reason for rejecting `flags`, or `None` to approve.
///
/// Any fatal flag rejects and the highest-priority fatal flag is the reason. Otherwise the
/// candidate is rejected once `soft_flag_threshold` soft flags are present, with the
/// highest-priority soft flag as the reason. Informational flags are never counted.
pub fn rejection_reason(
    flags: &BTreeSet<QualityFlag>,
    soft_flag_threshold: usize,
) -> Option<QualityFlag> {
    let fatal = flags
        .iter()
        .copied()
        .filter(QualityFlag::is_fatal)
        .min_by_key(QualityFlag::priority);
    if fatal.is_some() {
        return fatal;
    }

    let soft_count = flags.iter().filter(|f| f.is_soft()).count();
    if soft_count >= soft_flag_threshold {
        flags
            .iter()
            .copied()
            .filter(QualityFlag::is_soft)
            .min_by_key(QualityFlag::priority)
    } else {
        None
    }
}

/// Single entry point that turns candidates into verdicts.
///
/// The gate itself is stateless apart from the injected [`DuplicateIndex`], so one instance
/// can be shared across worker threads.
pub struct QualityGate<I: DuplicateIndex> {
    index: I,
    engine: RuleEngine,
    soft_flag_threshold: usize,
}

impl<I: DuplicateIndex> std::fmt::Debug for QualityGate<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QualityGate")
            .field("engine", &self.engine)
            .field("soft_flag_threshold", &self.soft_flag_threshold)
            .finish()
    }
}

impl<I: DuplicateIndex> QualityGate<I> {
    /// Builds a gate with every built-in check.
    pub fn new(index: I, config: GateConfig) -> Self {
        Self {
            index,
            engine: RuleEngine::new(config.rules),
            soft_flag_threshold: config.soft_flag_threshold,
        }
    }

    /// Builds a gate around a custom rule engine.
    pub fn with_engine(index: I, engine: RuleEngine, soft_flag_threshold: usize) -> Self {
        Self {
            index,
            engine,
            soft_flag_threshold,
        }
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    pub fn soft_flag_threshold(&self) -> usize {
        self.soft_flag_threshold
    }

    /// Evaluates one candidate.
    ///
    /// Re-submitting the same content in one run yields `DUPLICATE_EXACT` the second time.
    #[instrument(skip_all, fields(method = %candidate.extraction_method))]
    pub fn evaluate(&self, candidate: QACandidate) -> GateResult<ValidatedCandidate> {
        candidate.validate()?;

        let sighting = Sighting::from_texts(&candidate.question, &candidate.answer);
        let lookup = self
            .index
            .lookup_or_insert(&sighting)
            .inspect_err(|e| warn!(error = %e, "Duplicate check failed; refusing to decide"))?;

        let flags = self.engine.evaluate(&candidate, &lookup);
        let regions = detect_regions(&candidate.question, &candidate.answer);
        let reason = rejection_reason(&flags, self.soft_flag_threshold);

        debug!(
            question_hash = %sighting.question_hash,
            flags = flags.len(),
            approved = reason.is_none(),
            reason = reason.map(|r| r.code()),
            "Candidate evaluated"
        );

        Ok(ValidatedCandidate::new(
            candidate,
            sighting.question_hash,
            sighting.answer_hash,
            flags,
            reason,
            lookup.first_seen.or(lookup.near_duplicate_of),
        )
        .with_regions(regions))
    }

    /// Parses a JSON candidate and evaluates it.
    pub fn evaluate_json(&self, json: &str) -> GateResult<ValidatedCandidate> {
        let candidate = QACandidate::from_json(json)?;
        self.evaluate(candidate)
    }

    /// Like [`evaluate_json`](Self::evaluate_json) but takes one undecoded input line.
    pub fn evaluate_json_slice(&self, line: &[u8]) -> GateResult<ValidatedCandidate> {
        let candidate = QACandidate::from_json_slice(line)?;
        self.evaluate(candidate)
    }

    /// Evaluates candidates in order; one result per input.
    pub fn evaluate_batch<C>(&self, candidates: C) -> Vec<GateResult<ValidatedCandidate>>
    where
        C: IntoIterator<Item = QACandidate>,
    {
        candidates.into_iter().map(|c| self.evaluate(c)).collect()
    }
}
