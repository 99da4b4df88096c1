use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::hashing::Fingerprint;
use crate::index::CandidateRef;
use crate::rules::{QualityFlag, Region};

/// Extraction heuristic that produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    FaqPattern,
    HeaderInference,
    DefinitionExtraction,
}

impl ExtractionMethod {
    pub const ALL: [ExtractionMethod; 3] = [
        ExtractionMethod::FaqPattern,
        ExtractionMethod::HeaderInference,
        ExtractionMethod::DefinitionExtraction,
    ];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::FaqPattern => "faq_pattern",
            ExtractionMethod::HeaderInference => "header_inference",
            ExtractionMethod::DefinitionExtraction => "definition_extraction",
        }
    }

    /// Whether this method is expected to yield entity mentions.
    #[inline]
    pub fn expects_entities(&self) -> bool {
        matches!(self, ExtractionMethod::DefinitionExtraction)
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtractionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown extraction method: {}", s))
    }
}

/// Entity mention extracted alongside a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    pub confidence: f64,
}

impl Entity {
    pub fn new(kind: impl Into<String>, value: impl Into<String>, confidence: f64) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
            confidence,
        }
    }
}

/// Raw question/answer pair as handed over by an extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QACandidate {
    pub question: String,
    pub answer: String,
    /// Unordered labels.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Extractor's self-assessed reliability in `[0, 1]`.
    #[serde(default)]
    pub confidence: f64,
    #[serde(alias = "extractionMethod")]
    pub extraction_method: ExtractionMethod,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl QACandidate {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        extraction_method: ExtractionMethod,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            tags: BTreeSet::new(),
            confidence: 0.0,
            extraction_method,
            entities: Vec::new(),
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }
}

/// Gate verdict for one candidate.
///
/// `rejection_reason` is `Some` exactly when `is_approved` is `false`; the constructor is
/// crate-private so that pairing cannot be broken from outside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedCandidate {
    #[serde(flatten)]
    candidate: QACandidate,
    question_hash: Fingerprint,
    answer_hash: Fingerprint,
    quality_flags: BTreeSet<QualityFlag>,
    is_approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rejection_reason: Option<QualityFlag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duplicate_of: Option<CandidateRef>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    regions: BTreeSet<Region>,
}

impl ValidatedCandidate {
    pub(crate) fn new(
        candidate: QACandidate,
        question_hash: Fingerprint,
        answer_hash: Fingerprint,
        quality_flags: BTreeSet<QualityFlag>,
        rejection_reason: Option<QualityFlag>,
        duplicate_of: Option<CandidateRef>,
    ) -> Self {
        Self {
            candidate,
            question_hash,
            answer_hash,
            quality_flags,
            is_approved: rejection_reason.is_none(),
            rejection_reason,
            duplicate_of,
            regions: BTreeSet::new(),
        }
    }

    pub(crate) fn with_regions(mut self, regions: BTreeSet<Region>) -> Self {
        self.regions = regions;
        self
    }

    #[inline]
    pub fn candidate(&self) -> &QACandidate {
        &self.candidate
    }

    #[inline]
    pub fn into_candidate(self) -> QACandidate {
        self.candidate
    }

    #[inline]
    pub fn question(&self) -> &str {
        &self.candidate.question
    }

    #[inline]
    pub fn answer(&self) -> &str {
        &self.candidate.answer
    }

    #[inline]
    pub fn question_hash(&self) -> &Fingerprint {
        &self.question_hash
    }

    #[inline]
    pub fn answer_hash(&self) -> &Fingerprint {
        &self.answer_hash
    }

    /// Every flag raised during evaluation, not just the deciding one.
    #[inline]
    pub fn quality_flags(&self) -> &BTreeSet<QualityFlag> {
        &self.quality_flags
    }

    #[inline]
    pub fn has_flag(&self, flag: QualityFlag) -> bool {
        self.quality_flags.contains(&flag)
    }

    #[inline]
    pub fn is_approved(&self) -> bool {
        self.is_approved
    }

    #[inline]
    pub fn rejection_reason(&self) -> Option<QualityFlag> {
        self.rejection_reason
    }

    /// Earliest sighting of the repeated question or answer, or the most similar stored
    /// question for a near duplicate.
    #[inline]
    pub fn duplicate_of(&self) -> Option<CandidateRef> {
        self.duplicate_of
    }

    /// Jurisdictions named in the question or answer.
    #[inline]
    pub fn regions(&self) -> &BTreeSet<Region> {
        &self.regions
    }

    /// Heuristic 0-100 score for ordering review queues.
    ///
    /// Starts at 100, subtracts each flag's penalty, then adds a confidence bonus and a
    /// bonus for FAQ-pattern candidates.
    pub fn quality_score(&self) -> u8 {
        let penalties: i64 = self
            .quality_flags
            .iter()
            .map(|f| i64::from(f.score_penalty()))
            .sum();

        let confidence_bonus = ((self.candidate.confidence - 0.5) * 10.0).round() as i64;
        let method_bonus = match self.candidate.extraction_method {
            ExtractionMethod::FaqPattern => 15,
            _ => 0,
        };

        (100 - penalties + confidence_bonus + method_bonus).clamp(0, 100) as u8
    }
}
