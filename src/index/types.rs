use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MIN_SIGNATURE_TOKENS;
use crate::hashing::{Fingerprint, TokenSignature, fingerprint};

/// Sequence number the index assigns to the first sighting of new content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateRef(u64);

impl CandidateRef {
    #[inline]
    pub fn new(sequence: u64) -> Self {
        Self(sequence)
    }

    #[inline]
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CandidateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What one candidate contributes to the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sighting {
    pub question_hash: Fingerprint,
    pub answer_hash: Fingerprint,
    /// Question token set; `None` when the question is too short to sign.
    pub question_signature: Option<TokenSignature>,
}

impl Sighting {
    pub fn new(question_hash: Fingerprint, answer_hash: Fingerprint) -> Self {
        Self {
            question_hash,
            answer_hash,
            question_signature: None,
        }
    }

    pub fn with_signature(mut self, signature: TokenSignature) -> Self {
        self.question_signature = Some(signature);
        self
    }

    /// Fingerprints both texts and signs the question.
    pub fn from_texts(question: &str, answer: &str) -> Self {
        let signature = TokenSignature::from_text(question);

        Self {
            question_hash: fingerprint(question),
            answer_hash: fingerprint(answer),
            question_signature: (signature.len() >= MIN_SIGNATURE_TOKENS).then_some(signature),
        }
    }
}

/// Outcome of one atomic check-and-record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DuplicateLookup {
    pub duplicate_question: bool,
    pub duplicate_answer: bool,
    /// Earliest sighting of the question, or of the answer when only the answer repeats.
    pub first_seen: Option<CandidateRef>,
    /// Most similar stored question at or above the near-duplicate threshold, when the
    /// question itself is new.
    pub near_duplicate_of: Option<CandidateRef>,
}

impl DuplicateLookup {
    /// Lookup result for content never seen before.
    #[inline]
    pub fn fresh() -> Self {
        Self::default()
    }

    /// Both the question and the answer were seen before.
    #[inline]
    pub fn is_exact(&self) -> bool {
        self.duplicate_question && self.duplicate_answer
    }

    #[inline]
    pub fn is_first_sighting(&self) -> bool {
        !self.duplicate_question && !self.duplicate_answer
    }
}

/// Immutable record of a first sighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub first_seen: CandidateRef,
    pub seen_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureEntry {
    pub signature: TokenSignature,
    pub entry: IndexEntry,
}

/// Serializable copy of an in-memory index, for carrying corpus state between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub next_sequence: u64,
    pub questions: Vec<(Fingerprint, IndexEntry)>,
    pub answers: Vec<(Fingerprint, IndexEntry)>,
    pub signatures: Vec<SignatureEntry>,
}
