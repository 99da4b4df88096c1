//! Cross-cutting, shared constants.
//!
//! Gate thresholds live here as defaults; [`GateConfig`](crate::gate::GateConfig) carries the
//! runtime values. Keep the two in sync by deriving defaults from these constants only.

/// Soft flags at or above this count reject a candidate.
pub const DEFAULT_SOFT_FLAG_THRESHOLD: usize = 2;

pub const DEFAULT_FAQ_MIN_CONFIDENCE: f64 = 0.6;
pub const DEFAULT_HEADER_MIN_CONFIDENCE: f64 = 0.75;
/// Highest prior: definition extraction is the most error-prone producer.
pub const DEFAULT_DEFINITION_MIN_CONFIDENCE: f64 = 0.8;

pub const DEFAULT_MIN_ANSWER_TOKENS: usize = 15;
pub const DEFAULT_MAX_ANSWER_TOKENS: usize = 120;

pub const DEFAULT_MIN_ENTITY_CONFIDENCE: f64 = 0.5;

/// Token-set Jaccard similarity at or above which a new question is a near duplicate.
///
/// A one-word substitution in a 7-token question scores 0.75; reordering scores 1.0.
pub const DEFAULT_NEAR_DUPLICATE_SIMILARITY: f64 = 0.7;

/// Length of a hex-encoded 256-bit fingerprint.
pub const FINGERPRINT_HEX_LEN: usize = 64;

/// Questions with fewer normalized tokens are not signed for near-duplicate matching.
pub const MIN_SIGNATURE_TOKENS: usize = 3;
