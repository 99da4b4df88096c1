//! Rule engine: independent checks that turn one candidate into a set of quality flags.
//!
//! Checks are registered in an ordered list and share one contract
//! (candidate + duplicate lookup -> flags). Adding a rule means registering another
//! [`QualityCheck`]; the orchestrator never changes. Severity is a property of each
//! [`QualityFlag`], not of the check that raised it.
//!
//! | Flag | Severity |
//! |---|---|
//! | `DUPLICATE_EXACT`, `EMPTY_CONTENT`, `LOW_CONFIDENCE`, `LEGAL_ADVICE` | fatal |
//! | `DUPLICATE_QUESTION`, `NEAR_DUPLICATE`, `TOO_SHORT`, `LOW_ENTITY_CONFIDENCE`, `NO_ENTITIES`, `UNCLEAR_QUESTION`, `MARKETING_TONE`, `DUPLICATE_ANSWER`, `TOO_LONG` | soft |
//! | `REGION_SPECIFIC` | info |

pub mod checks;
pub mod config;
pub mod edits;
pub mod engine;
pub mod flags;
pub mod regions;


pub use config::RuleConfig;
pub use edits::{SuggestedEdits, normalize_answer, suggest_edits};
pub use engine::{CheckContext, FnCheck, QualityCheck, RuleEngine};
pub use flags::{QualityFlag, Severity};
pub use regions::{Region, detect_regions};
