//! Process-local duplicate index.
//!
//! All state sits behind one [`parking_lot::Mutex`]; a whole check-and-record (exact maps plus
//! signature postings) runs under a single acquisition, so two identical candidates racing
//! each other can never both see a first sighting.
//!
//! Near duplicates use prefix filtering: each stored signature posts only the prefix tokens
//! for the configured similarity, a new question is looked up by its own prefix, and every
//! candidate found that way is verified with an exact Jaccard similarity.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, info};

use super::DuplicateIndex;
use super::error::IndexResult;
use super::types::{
    CandidateRef, DuplicateLookup, IndexEntry, IndexSnapshot, Sighting, SignatureEntry,
};
use crate::constants::DEFAULT_NEAR_DUPLICATE_SIMILARITY;
use crate::hashing::{Fingerprint, TokenSignature};

/// Keeps a similarity inside `(0, 1]`; non-finite values fall back to the default.
fn clamp_similarity(similarity: f64) -> f64 {
    if similarity.is_finite() {
        similarity.clamp(f64::EPSILON, 1.0)
    } else {
        DEFAULT_NEAR_DUPLICATE_SIMILARITY
    }
}

#[derive(Debug)]
struct IndexState {
    questions: HashMap<Fingerprint, IndexEntry>,
    answers: HashMap<Fingerprint, IndexEntry>,
    signatures: Vec<SignatureEntry>,
    /// Prefix token -> slots in `signatures`.
    postings: HashMap<u64, Vec<usize>>,
    similarity: f64,
    next_sequence: u64,
}

impl IndexState {
    fn new(similarity: f64) -> Self {
        Self {
            questions: HashMap::new(),
            answers: HashMap::new(),
            signatures: Vec::new(),
            postings: HashMap::new(),
            similarity,
            next_sequence: 0,
        }
    }

    fn post(&mut self, slot: usize) {
        let similarity = self.similarity;
        for token in self.signatures[slot].signature.prefix(similarity) {
            self.postings.entry(*token).or_default().push(slot);
        }
    }

    fn push_signature(&mut self, signature: TokenSignature, entry: IndexEntry) {
        self.signatures.push(SignatureEntry { signature, entry });
        self.post(self.signatures.len() - 1);
    }

    fn rebuild_postings(&mut self) {
        self.postings.clear();
        for slot in 0..self.signatures.len() {
            self.post(slot);
        }
    }

    /// Most similar stored question at or above the threshold; ties go to the earliest
    /// sighting.
    fn nearest(&self, signature: &TokenSignature) -> Option<CandidateRef> {
        let mut slots: Vec<usize> = signature
            .prefix(self.similarity)
            .iter()
            .filter_map(|token| self.postings.get(token))
            .flatten()
            .copied()
            .collect();
        slots.sort_unstable();
        slots.dedup();

        let mut best: Option<(f64, CandidateRef)> = None;
        for stored in slots.into_iter().map(|slot| &self.signatures[slot]) {
            let similarity = signature.jaccard(&stored.signature);
            if similarity < self.similarity {
                continue;
            }
            let first_seen = stored.entry.first_seen;
            let better = match best {
                None => true,
                Some((top, earliest)) => {
                    similarity > top || (similarity == top && first_seen < earliest)
                }
            };
            if better {
                best = Some((similarity, first_seen));
            }
        }

        best.map(|(_, first_seen)| first_seen)
    }

    fn allocate(&mut self, now: DateTime<Utc>) -> IndexEntry {
        let entry = IndexEntry {
            first_seen: CandidateRef::new(self.next_sequence),
            seen_at: now,
        };
        self.next_sequence += 1;
        entry
    }
}

/// In-memory [`DuplicateIndex`]; reset per process unless restored from an [`IndexSnapshot`].
pub struct InMemoryDuplicateIndex {
    state: Mutex<IndexState>,
}

impl InMemoryDuplicateIndex {
    /// Creates an empty index with the default near-duplicate similarity.
    pub fn new() -> Self {
        Self::with_near_duplicate_similarity(DEFAULT_NEAR_DUPLICATE_SIMILARITY)
    }

    /// Creates an empty index. The similarity is clamped into `(0, 1]`.
    pub fn with_near_duplicate_similarity(similarity: f64) -> Self {
        Self {
            state: Mutex::new(IndexState::new(clamp_similarity(similarity))),
        }
    }

    /// Restores an index from a snapshot taken with [`snapshot`](Self::snapshot).
    ///
    /// Postings are rebuilt for `near_duplicate_similarity`, which may differ from the one the
    /// snapshot was taken with.
    pub fn from_snapshot(snapshot: IndexSnapshot, near_duplicate_similarity: f64) -> Self {
        let highest = snapshot
            .questions
            .iter()
            .chain(snapshot.answers.iter())
            .map(|(_, e)| e.first_seen.sequence() + 1)
            .max()
            .unwrap_or(0);

        let mut state = IndexState::new(clamp_similarity(near_duplicate_similarity));
        state.questions = snapshot.questions.into_iter().collect();
        state.answers = snapshot.answers.into_iter().collect();
        state.signatures = snapshot.signatures;
        state.next_sequence = snapshot.next_sequence.max(highest);
        state.rebuild_postings();

        info!(
            questions = state.questions.len(),
            answers = state.answers.len(),
            "Duplicate index restored from snapshot"
        );

        Self {
            state: Mutex::new(state),
        }
    }

    /// Copies the current state, entries ordered by first sighting.
    pub fn snapshot(&self) -> IndexSnapshot {
        let state = self.state.lock();

        let mut questions: Vec<_> = state.questions.iter().map(|(k, v)| (*k, *v)).collect();
        let mut answers: Vec<_> = state.answers.iter().map(|(k, v)| (*k, *v)).collect();
        questions.sort_by_key(|(k, e)| (e.first_seen, *k));
        answers.sort_by_key(|(k, e)| (e.first_seen, *k));

        IndexSnapshot {
            next_sequence: state.next_sequence,
            questions,
            answers,
            signatures: state.signatures.clone(),
        }
    }

    pub fn near_duplicate_similarity(&self) -> f64 {
        self.state.lock().similarity
    }

    /// Number of distinct questions recorded.
    pub fn len(&self) -> usize {
        self.state.lock().questions.len()
    }

    pub fn is_empty(&self) -> bool {
        let state = self.state.lock();
        state.questions.is_empty() && state.answers.is_empty()
    }

    pub fn answer_count(&self) -> usize {
        self.state.lock().answers.len()
    }

    pub fn contains_question(&self, hash: &Fingerprint) -> bool {
        self.state.lock().questions.contains_key(hash)
    }

    pub fn contains_answer(&self, hash: &Fingerprint) -> bool {
        self.state.lock().answers.contains_key(hash)
    }

    /// Maintenance: drops entries first seen before `cutoff`. Returns how many were removed.
    ///
    /// Not part of the per-candidate contract; run it between pipeline runs.
    pub fn evict_before(&self, cutoff: DateTime<Utc>) -> usize {
        let mut state = self.state.lock();
        let before = state.questions.len() + state.answers.len();

        state.questions.retain(|_, e| e.seen_at >= cutoff);
        state.answers.retain(|_, e| e.seen_at >= cutoff);
        state.signatures.retain(|s| s.entry.seen_at >= cutoff);
        state.rebuild_postings();

        let removed = before - (state.questions.len() + state.answers.len());
        info!(removed, %cutoff, "Evicted duplicate index entries");
        removed
    }

    /// Maintenance: forgets everything. Sequence numbers keep increasing.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.questions.clear();
        state.answers.clear();
        state.signatures.clear();
        state.postings.clear();
    }
}

impl DuplicateIndex for InMemoryDuplicateIndex {
    fn lookup_or_insert(&self, sighting: &Sighting) -> IndexResult<DuplicateLookup> {
        let now = Utc::now();
        let mut state = self.state.lock();

        let question = state.questions.get(&sighting.question_hash).copied();
        let answer = state.answers.get(&sighting.answer_hash).copied();

        let near_duplicate_of = match (question, &sighting.question_signature) {
            (None, Some(signature)) => state.nearest(signature),
            _ => None,
        };

        if question.is_none() || answer.is_none() {
            let entry = state.allocate(now);
            if question.is_none() {
                state.questions.insert(sighting.question_hash, entry);
                if let Some(signature) = &sighting.question_signature {
                    state.push_signature(signature.clone(), entry);
                }
            }
            if answer.is_none() {
                state.answers.insert(sighting.answer_hash, entry);
            }
        }

        let lookup = DuplicateLookup {
            duplicate_question: question.is_some(),
            duplicate_answer: answer.is_some(),
            first_seen: question.or(answer).map(|e| e.first_seen),
            near_duplicate_of,
        };

        debug!(
            duplicate_question = lookup.duplicate_question,
            duplicate_answer = lookup.duplicate_answer,
            near_duplicate = lookup.near_duplicate_of.is_some(),
            "Duplicate index lookup"
        );

        Ok(lookup)
    }
}

impl Default for InMemoryDuplicateIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryDuplicateIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("InMemoryDuplicateIndex")
            .field("questions", &state.questions.len())
            .field("answers", &state.answers.len())
            .field("signatures", &state.signatures.len())
            .field("near_duplicate_similarity", &state.similarity)
            .finish()
    }
}
