use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::error::{IndexError, IndexResult};
use super::memory::InMemoryDuplicateIndex;
use super::types::{DuplicateLookup, Sighting};
use super::DuplicateIndex;

/// In-memory index that can be switched "offline" to exercise failure handling.
#[derive(Debug, Default)]
pub struct MockDuplicateIndex {
    inner: InMemoryDuplicateIndex,
    unavailable: AtomicBool,
    calls: AtomicUsize,
}

impl MockDuplicateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an index that fails every call until [`set_available`](Self::set_available).
    pub fn unavailable() -> Self {
        let index = Self::default();
        index.set_available(false);
        index
    }

    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &InMemoryDuplicateIndex {
        &self.inner
    }
}

impl DuplicateIndex for MockDuplicateIndex {
    fn lookup_or_insert(&self, sighting: &Sighting) -> IndexResult<DuplicateLookup> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(IndexError::Unavailable {
                reason: "mock index offline".to_string(),
            });
        }

        self.inner.lookup_or_insert(sighting)
    }
}
