//! Test fixtures for integration tests.

use keel::candidate::{Entity, ExtractionMethod, QACandidate};

pub const HULL_QUESTION: &str = "What is hull insurance?";

/// Clean answer, comfortably inside the default token bounds.
pub const HULL_ANSWER: &str = "Hull insurance covers physical damage to the vessel's structure, \
    machinery, and equipment, including the engine, sails, masts and permanently attached \
    fittings, after perils such as collision, grounding, fire or storm.";

pub const MOORING_QUESTION: &str = "Does my policy cover damage while moored?";

pub const MOORING_ANSWER: &str = "Most yacht policies cover damage while the vessel is moored \
    at a recognised marina or swing mooring, provided the mooring gear was inspected within \
    the period stated in the schedule.";

pub struct CandidateBuilder {
    question: String,
    answer: String,
    method: ExtractionMethod,
    confidence: f64,
    tags: Vec<String>,
    entities: Vec<Entity>,
}

impl Default for CandidateBuilder {
    fn default() -> Self {
        Self {
            question: HULL_QUESTION.to_string(),
            answer: HULL_ANSWER.to_string(),
            method: ExtractionMethod::FaqPattern,
            confidence: 0.9,
            tags: Vec::new(),
            entities: Vec::new(),
        }
    }
}

impl CandidateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn question(mut self, question: &str) -> Self {
        self.question = question.to_string();
        self
    }

    pub fn answer(mut self, answer: &str) -> Self {
        self.answer = answer.to_string();
        self
    }

    pub fn method(mut self, method: ExtractionMethod) -> Self {
        self.method = method;
        self
    }

    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    pub fn entity(mut self, kind: &str, value: &str, confidence: f64) -> Self {
        self.entities.push(Entity::new(kind, value, confidence));
        self
    }

    pub fn build(self) -> QACandidate {
        let mut candidate = QACandidate::new(self.question, self.answer, self.method)
            .with_confidence(self.confidence);
        for tag in self.tags {
            candidate = candidate.with_tag(tag);
        }
        for entity in self.entities {
            candidate = candidate.with_entity(entity);
        }
        candidate
    }

    pub fn to_json(self) -> String {
        serde_json::to_string(&self.build()).expect("candidate serializes")
    }
}

/// `count` distinct clean candidates. Questions stay under the signature token minimum so
/// they never match each other as near duplicates.
pub fn distinct_candidates(count: usize) -> Vec<QACandidate> {
    (0..count)
        .map(|i| {
            CandidateBuilder::new()
                .question(&format!("Clause {i}?"))
                .answer(&format!("{HULL_ANSWER} Clause {i} extends this to racing."))
                .build()
        })
        .collect()
}
