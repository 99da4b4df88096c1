use crate::config::{ConfigError, parse_from_env};
use crate::constants::{DEFAULT_NEAR_DUPLICATE_SIMILARITY, DEFAULT_SOFT_FLAG_THRESHOLD};
use crate::rules::RuleConfig;

/// Approval policy plus the thresholds handed to the rule engine.
#[derive(Debug, Clone, PartialEq)]
pub struct GateConfig {
    /// Soft flags at or above this count reject. Default: `2`.
    pub soft_flag_threshold: usize,
    /// Question token-set similarity that raises `NEAR_DUPLICATE`, in `(0, 1]`. Default: `0.7`.
    pub near_duplicate_similarity: f64,
    pub rules: RuleConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            soft_flag_threshold: DEFAULT_SOFT_FLAG_THRESHOLD,
            near_duplicate_similarity: DEFAULT_NEAR_DUPLICATE_SIMILARITY,
            rules: RuleConfig::default(),
        }
    }
}

impl GateConfig {
    const ENV_SOFT_FLAG_THRESHOLD: &'static str = "KEEL_SOFT_FLAG_THRESHOLD";
    const ENV_NEAR_DUPLICATE_SIMILARITY: &'static str = "KEEL_NEAR_DUPLICATE_SIMILARITY";

    /// Loads config from environment variables (with defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            soft_flag_threshold: parse_from_env(
                Self::ENV_SOFT_FLAG_THRESHOLD,
                defaults.soft_flag_threshold,
            )?,
            near_duplicate_similarity: parse_from_env(
                Self::ENV_NEAR_DUPLICATE_SIMILARITY,
                defaults.near_duplicate_similarity,
            )?,
            rules: RuleConfig::from_env()?,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.soft_flag_threshold == 0 {
            return Err(ConfigError::Zero {
                name: Self::ENV_SOFT_FLAG_THRESHOLD,
            });
        }

        let similarity = self.near_duplicate_similarity;
        if !(similarity.is_finite() && similarity > 0.0 && similarity <= 1.0) {
            return Err(ConfigError::SimilarityOutOfRange {
                name: Self::ENV_NEAR_DUPLICATE_SIMILARITY,
                value: similarity,
            });
        }

        self.rules.validate()
    }

    pub fn with_soft_flag_threshold(mut self, threshold: usize) -> Self {
        self.soft_flag_threshold = threshold;
        self
    }
}
