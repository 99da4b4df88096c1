//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was set but could not be parsed.
    #[error("invalid value '{value}' for {name}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A threshold that must be a probability is outside `[0, 1]`.
    #[error("{name} must be between 0 and 1, got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    /// The soft-flag threshold or worker count is zero.
    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },

    #[error("min_answer_tokens ({min}) exceeds max_answer_tokens ({max})")]
    AnswerBoundsInverted { min: usize, max: usize },

    /// The near-duplicate similarity is outside `(0, 1]`.
    #[error("{name} must be greater than 0 and at most 1, got {value}")]
    SimilarityOutOfRange { name: &'static str, value: f64 },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a file (when a file was expected).
    #[error("path is not a file: {path}")]
    NotAFile { path: PathBuf },
}
