//! Duplicate index: "have we seen this content before?"
//!
//! The gate talks to the index through exactly one call per candidate,
//! [`DuplicateIndex::lookup_or_insert`], which must check and record atomically. Entries are
//! append-only during a run; eviction is a separate maintenance step.

pub mod error;
pub mod memory;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod types;


use std::sync::Arc;

pub use error::{IndexError, IndexResult};
pub use memory::InMemoryDuplicateIndex;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockDuplicateIndex;
pub use types::{
    CandidateRef, DuplicateLookup, IndexEntry, IndexSnapshot, Sighting, SignatureEntry,
};

/// Fingerprint store shared by every worker feeding the gate.
///
/// Implementations backed by an external store do their blocking I/O (and any retries)
/// inside this call and report failure as an [`IndexError`]; they must never answer
/// "not a duplicate" when the check did not happen.
pub trait DuplicateIndex: Send + Sync {
    /// Checks both hashes (and the question signature) and records whatever is new, as one
    /// atomic step.
    fn lookup_or_insert(&self, sighting: &Sighting) -> IndexResult<DuplicateLookup>;
}

impl<T: DuplicateIndex + ?Sized> DuplicateIndex for Arc<T> {
    #[inline]
    fn lookup_or_insert(&self, sighting: &Sighting) -> IndexResult<DuplicateLookup> {
        (**self).lookup_or_insert(sighting)
    }
}

impl<T: DuplicateIndex + ?Sized> DuplicateIndex for &T {
    #[inline]
    fn lookup_or_insert(&self, sighting: &Sighting) -> IndexResult<DuplicateLookup> {
        (**self).lookup_or_insert(sighting)
    }
}
