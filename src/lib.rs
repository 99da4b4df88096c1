//! Keel library crate (used by the batch runner and integration tests).
//!
//! Keel is a deterministic quality gate for question/answer candidates produced by automated
//! extractors. Every candidate is fingerprinted, checked against a shared duplicate index,
//! run through an ordered set of quality checks and returned as a verdict: approved, or
//! rejected with one dominant reason.
//!
//! # Public API Surface
//!
//! ## Gate
//! - [`QualityGate`], [`GateConfig`], [`GateError`] - Single evaluation entry point
//! - [`GateSummary`] - Batch-level tallies
//! - [`split_lines`], [`render_verdicts`] - JSON Lines framing for batch runs
//!
//! ## Candidates
//! - [`QACandidate`], [`ValidatedCandidate`], [`ExtractionMethod`], [`Entity`]
//!
//! ## Rules
//! - [`RuleEngine`], [`QualityCheck`], [`FnCheck`] - Check registry
//! - [`QualityFlag`], [`Severity`] - Closed flag set and rejection priority
//! - [`Region`], [`detect_regions`] - Jurisdiction markers behind `REGION_SPECIFIC`
//! - [`suggest_edits`], [`normalize_answer`] - Advisory rewrites for reviewers
//!
//! ## Duplicate Index
//! - [`DuplicateIndex`] - Atomic lookup-or-insert seam
//! - [`InMemoryDuplicateIndex`], [`IndexSnapshot`] - Default store and its persisted form
//!
//! ## Utilities
//! - Hashing functions for text normalization, fingerprints and question token signatures
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod candidate;
pub mod config;
pub mod constants;
pub mod gate;
pub mod hashing;
pub mod index;
pub mod rules;

pub use candidate::{CandidateError, Entity, ExtractionMethod, QACandidate, ValidatedCandidate};
pub use config::{Config, ConfigError};
pub use constants::{DEFAULT_NEAR_DUPLICATE_SIMILARITY, DEFAULT_SOFT_FLAG_THRESHOLD};
pub use gate::{
    GateConfig, GateError, GateResult, GateSummary, InputLine, QualityGate, approved_only,
    rejection_reason, render_verdicts, split_lines,
};
pub use hashing::{Fingerprint, TokenSignature, fingerprint, normalize_text};
#[cfg(any(test, feature = "mock"))]
pub use index::MockDuplicateIndex;
pub use index::{
    CandidateRef, DuplicateIndex, DuplicateLookup, InMemoryDuplicateIndex, IndexError,
    IndexResult, IndexSnapshot, Sighting,
};
pub use rules::{
    CheckContext, FnCheck, QualityCheck, QualityFlag, Region, RuleConfig, RuleEngine, Severity,
    SuggestedEdits, detect_regions, normalize_answer, suggest_edits,
};
