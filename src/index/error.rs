use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    /// The backing store could not be reached; the sighting was neither checked nor recorded.
    #[error("duplicate index unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("duplicate index backend error: {0}")]
    Backend(String),
}

pub type IndexResult<T> = Result<T, IndexError>;
