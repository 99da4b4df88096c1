//! Quality gate: the single decision point between extraction and storage.
//!
//! [`QualityGate::evaluate`] runs, in order:
//!
//! 1. fingerprint question and answer ([`crate::hashing`]),
//! 2. one atomic `lookup_or_insert` on the injected [`DuplicateIndex`](crate::index::DuplicateIndex),
//! 3. every registered check ([`crate::rules`]), unioning their flags, and region detection,
//! 4. the approval decision ([`rejection_reason`]).
//!
//! A candidate is approved only when no fatal flag was raised and fewer than
//! `soft_flag_threshold` soft flags were. The rejection reason is the highest-priority
//! fatal flag, or failing that the highest-priority soft flag.
//!
//! # Idempotence
//!
//! Given the same index state, the same candidate always produces the same hashes, flags and
//! verdict. Submitting it twice in one run is different on purpose: the second call sees the
//! first and comes back `DUPLICATE_EXACT`.

pub mod config;
pub mod error;
pub mod jsonl;
pub mod orchestrator;
pub mod summary;

#[cfg(test)]
mod tests;

pub use config::GateConfig;
pub use error::{GateError, GateResult};
pub use jsonl::{InputLine, render_verdicts, split_lines};
pub use orchestrator::{QualityGate, rejection_reason};
pub use summary::{GateSummary, approved_only};
