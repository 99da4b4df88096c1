use thiserror::Error;

use crate::candidate::CandidateError;
use crate::index::IndexError;

/// Why the gate produced no verdict. A rejected candidate is a verdict, not an error.
#[derive(Debug, Error)]
pub enum GateError {
    /// The candidate was refused before evaluation; the duplicate index was not touched.
    #[error("invalid candidate: {0}")]
    InvalidCandidate(#[from] CandidateError),

    /// The duplicate check did not happen. Callers retry or route to manual review; the gate
    /// never approves without it.
    #[error("duplicate check failed: {0}")]
    DuplicateCheckFailed(#[from] IndexError),
}

pub type GateResult<T> = Result<T, GateError>;
