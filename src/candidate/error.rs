use thiserror::Error;

/// Reasons a candidate is refused before evaluation.
#[derive(Debug, Error)]
pub enum CandidateError {
    /// JSON did not parse, or a required field (`question`, `answer`, `extraction_method`)
    /// was missing or had an unknown value.
    #[error("malformed candidate: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("confidence {value} is not a finite value in [0, 1]")]
    ConfidenceOutOfRange { value: f64 },

    #[error("entity #{index} confidence {value} is not a finite value in [0, 1]")]
    EntityConfidenceOutOfRange { index: usize, value: f64 },
}
