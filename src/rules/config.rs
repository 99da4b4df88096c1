use crate::candidate::ExtractionMethod;
use crate::config::{ConfigError, parse_from_env};
use crate::constants::{
    DEFAULT_DEFINITION_MIN_CONFIDENCE, DEFAULT_FAQ_MIN_CONFIDENCE, DEFAULT_HEADER_MIN_CONFIDENCE,
    DEFAULT_MAX_ANSWER_TOKENS, DEFAULT_MIN_ANSWER_TOKENS, DEFAULT_MIN_ENTITY_CONFIDENCE,
};

/// Thresholds read by the built-in checks.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleConfig {
    pub faq_min_confidence: f64,
    pub header_min_confidence: f64,
    pub definition_min_confidence: f64,
    /// Answers with fewer normalized tokens raise `TOO_SHORT`.
    pub min_answer_tokens: usize,
    /// Answers with more normalized tokens raise `TOO_LONG`.
    pub max_answer_tokens: usize,
    /// Any entity below this raises `LOW_ENTITY_CONFIDENCE`.
    pub min_entity_confidence: f64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            faq_min_confidence: DEFAULT_FAQ_MIN_CONFIDENCE,
            header_min_confidence: DEFAULT_HEADER_MIN_CONFIDENCE,
            definition_min_confidence: DEFAULT_DEFINITION_MIN_CONFIDENCE,
            min_answer_tokens: DEFAULT_MIN_ANSWER_TOKENS,
            max_answer_tokens: DEFAULT_MAX_ANSWER_TOKENS,
            min_entity_confidence: DEFAULT_MIN_ENTITY_CONFIDENCE,
        }
    }
}

impl RuleConfig {
    const ENV_FAQ_MIN_CONFIDENCE: &'static str = "KEEL_FAQ_MIN_CONFIDENCE";
    const ENV_HEADER_MIN_CONFIDENCE: &'static str = "KEEL_HEADER_MIN_CONFIDENCE";
    const ENV_DEFINITION_MIN_CONFIDENCE: &'static str = "KEEL_DEFINITION_MIN_CONFIDENCE";
    const ENV_MIN_ANSWER_TOKENS: &'static str = "KEEL_MIN_ANSWER_TOKENS";
    const ENV_MAX_ANSWER_TOKENS: &'static str = "KEEL_MAX_ANSWER_TOKENS";
    const ENV_MIN_ENTITY_CONFIDENCE: &'static str = "KEEL_MIN_ENTITY_CONFIDENCE";

    /// Loads thresholds from environment variables (with defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            faq_min_confidence: parse_from_env(
                Self::ENV_FAQ_MIN_CONFIDENCE,
                defaults.faq_min_confidence,
            )?,
            header_min_confidence: parse_from_env(
                Self::ENV_HEADER_MIN_CONFIDENCE,
                defaults.header_min_confidence,
            )?,
            definition_min_confidence: parse_from_env(
                Self::ENV_DEFINITION_MIN_CONFIDENCE,
                defaults.definition_min_confidence,
            )?,
            min_answer_tokens: parse_from_env(
                Self::ENV_MIN_ANSWER_TOKENS,
                defaults.min_answer_tokens,
            )?,
            max_answer_tokens: parse_from_env(
                Self::ENV_MAX_ANSWER_TOKENS,
                defaults.max_answer_tokens,
            )?,
            min_entity_confidence: parse_from_env(
                Self::ENV_MIN_ENTITY_CONFIDENCE,
                defaults.min_entity_confidence,
            )?,
        })
    }

    /// Confidence a candidate from `method` must reach.
    #[inline]
    pub fn min_confidence(&self, method: ExtractionMethod) -> f64 {
        match method {
            ExtractionMethod::FaqPattern => self.faq_min_confidence,
            ExtractionMethod::HeaderInference => self.header_min_confidence,
            ExtractionMethod::DefinitionExtraction => self.definition_min_confidence,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let probabilities = [
            (Self::ENV_FAQ_MIN_CONFIDENCE, self.faq_min_confidence),
            (Self::ENV_HEADER_MIN_CONFIDENCE, self.header_min_confidence),
            (Self::ENV_DEFINITION_MIN_CONFIDENCE, self.definition_min_confidence),
            (Self::ENV_MIN_ENTITY_CONFIDENCE, self.min_entity_confidence),
        ];

        if let Some((name, value)) = probabilities
            .into_iter()
            .find(|(_, v)| !(v.is_finite() && (0.0..=1.0).contains(v)))
        {
            return Err(ConfigError::ThresholdOutOfRange { name, value });
        }

        if self.min_answer_tokens > self.max_answer_tokens {
            return Err(ConfigError::AnswerBoundsInverted {
                min: self.min_answer_tokens,
                max: self.max_answer_tokens,
            });
        }

        Ok(())
    }
}
