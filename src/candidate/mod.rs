//! Candidate types at the gate's input and output boundaries.
//!
//! [`QACandidate`] is what extractors produce; [`ValidatedCandidate`] is what the gate emits.
//! Parsing and range validation live here so the gate can refuse malformed input before it
//! touches the duplicate index.

pub mod error;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::CandidateError;
pub use types::{Entity, ExtractionMethod, QACandidate, ValidatedCandidate};

#[inline]
fn is_unit_interval(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

impl QACandidate {
    /// Parses one candidate from JSON and validates it.
    pub fn from_json(json: &str) -> Result<Self, CandidateError> {
        let candidate: QACandidate = serde_json::from_str(json)?;
        candidate.validate()?;
        Ok(candidate)
    }

    /// Same as [`from_json`](Self::from_json) for raw bytes. Invalid UTF-8 is a
    /// [`CandidateError::Malformed`], not a panic.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, CandidateError> {
        let candidate: QACandidate = serde_json::from_slice(bytes)?;
        candidate.validate()?;
        Ok(candidate)
    }

    /// Checks numeric ranges. Empty text is not an error here; the rule engine flags it.
    pub fn validate(&self) -> Result<(), CandidateError> {
        if !is_unit_interval(self.confidence) {
            return Err(CandidateError::ConfidenceOutOfRange {
                value: self.confidence,
            });
        }

        if let Some((index, entity)) = self
            .entities
            .iter()
            .enumerate()
            .find(|(_, e)| !is_unit_interval(e.confidence))
        {
            return Err(CandidateError::EntityConfidenceOutOfRange {
                index,
                value: entity.confidence,
            });
        }

        Ok(())
    }
}
