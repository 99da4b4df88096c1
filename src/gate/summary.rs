use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::error::GateResult;
use crate::candidate::ValidatedCandidate;
use crate::rules::QualityFlag;

/// Batch-level tally of gate outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GateSummary {
    pub total: usize,
    pub approved: usize,
    pub rejected: usize,
    /// Inputs that produced a [`GateError`](super::GateError) instead of a verdict.
    pub errors: usize,
    pub rejections_by_reason: BTreeMap<QualityFlag, usize>,
    /// Every raised flag, approved candidates included.
    pub flag_counts: BTreeMap<QualityFlag, usize>,
}

impl GateSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, verdict: &ValidatedCandidate) {
        self.total += 1;

        match verdict.rejection_reason() {
            None => self.approved += 1,
            Some(reason) => {
                self.rejected += 1;
                *self.rejections_by_reason.entry(reason).or_default() += 1;
            }
        }

        for flag in verdict.quality_flags() {
            *self.flag_counts.entry(*flag).or_default() += 1;
        }
    }

    pub fn record_error(&mut self) {
        self.total += 1;
        self.errors += 1;
    }

    pub fn record_result(&mut self, result: &GateResult<ValidatedCandidate>) {
        match result {
            Ok(verdict) => self.record(verdict),
            Err(_) => self.record_error(),
        }
    }

    pub fn from_results<'a, R>(results: R) -> Self
    where
        R: IntoIterator<Item = &'a GateResult<ValidatedCandidate>>,
    {
        let mut summary = Self::new();
        for result in results {
            summary.record_result(result);
        }
        summary
    }

    /// Share of verdicts that were approved; errors excluded. `0.0` when nothing was judged.
    pub fn approval_rate(&self) -> f64 {
        let judged = self.approved + self.rejected;
        if judged == 0 {
            0.0
        } else {
            self.approved as f64 / judged as f64
        }
    }
}

impl fmt::Display for GateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} candidates: {} approved, {} rejected, {} errors",
            self.total, self.approved, self.rejected, self.errors
        )?;

        if !self.rejections_by_reason.is_empty() {
            let reasons: Vec<String> = self
                .rejections_by_reason
                .iter()
                .map(|(flag, count)| format!("{}={}", flag, count))
                .collect();
            write!(f, " ({})", reasons.join(", "))?;
        }

        Ok(())
    }
}

/// Keeps only approved verdicts, in order.
pub fn approved_only<V>(verdicts: V) -> Vec<ValidatedCandidate>
where
    V: IntoIterator<Item = ValidatedCandidate>,
{
    verdicts.into_iter().filter(|v| v.is_approved()).collect()
}
