use super::*;
use crate::hashing::fingerprint;
use crate::rules::{QualityFlag, Region};
use std::collections::BTreeSet;

#[test]
fn test_extraction_method_round_trip_str() {
    for method in ExtractionMethod::ALL {
        assert_eq!(method.as_str().parse::<ExtractionMethod>(), Ok(method));
    }
    assert!("regex_guess".parse::<ExtractionMethod>().is_err());
}

#[test]
fn test_extraction_method_expects_entities() {
    assert!(ExtractionMethod::DefinitionExtraction.expects_entities());
    assert!(!ExtractionMethod::FaqPattern.expects_entities());
    assert!(!ExtractionMethod::HeaderInference.expects_entities());
}

#[test]
fn test_from_json_camel_case_method() {
    let json = r#"{
        "question": "What is hull insurance?",
        "answer": "Hull insurance covers the vessel.",
        "tags": ["coverage", "definitions", "coverage"],
        "confidence": 0.9,
        "extractionMethod": "faq_pattern",
        "entities": [{"type": "term", "value": "hull insurance", "confidence": 0.95}]
    }"#;

    let candidate = QACandidate::from_json(json).expect("valid candidate");
    assert_eq!(candidate.extraction_method, ExtractionMethod::FaqPattern);
    assert_eq!(candidate.tags.len(), 2);
    assert_eq!(candidate.entities[0].kind, "term");
    assert_eq!(candidate.entities[0].value, "hull insurance");
}

#[test]
fn test_from_json_snake_case_method_and_defaults() {
    let json = r#"{"question": "Q?", "answer": "A", "extraction_method": "header_inference"}"#;

    let candidate = QACandidate::from_json(json).expect("valid candidate");
    assert_eq!(candidate.extraction_method, ExtractionMethod::HeaderInference);
    assert!(candidate.tags.is_empty());
    assert!(candidate.entities.is_empty());
    assert_eq!(candidate.confidence, 0.0);
}

#[test]
fn test_from_json_missing_fields() {
    let missing_answer = r#"{"question": "Q?", "extraction_method": "faq_pattern"}"#;
    let missing_question = r#"{"answer": "A", "extraction_method": "faq_pattern"}"#;
    let missing_method = r#"{"question": "Q?", "answer": "A"}"#;

    for json in [missing_answer, missing_question, missing_method] {
        assert!(matches!(
            QACandidate::from_json(json),
            Err(CandidateError::Malformed(_))
        ));
    }
}

#[test]
fn test_from_json_unknown_method() {
    let json = r#"{"question": "Q?", "answer": "A", "extraction_method": "llm_guess"}"#;
    assert!(matches!(
        QACandidate::from_json(json),
        Err(CandidateError::Malformed(_))
    ));
}

#[test]
fn test_validate_confidence_range() {
    let base = QACandidate::new("Q?", "A", ExtractionMethod::FaqPattern);

    assert!(base.clone().with_confidence(0.0).validate().is_ok());
    assert!(base.clone().with_confidence(1.0).validate().is_ok());
    assert!(matches!(
        base.clone().with_confidence(1.2).validate(),
        Err(CandidateError::ConfidenceOutOfRange { .. })
    ));
    assert!(matches!(
        base.clone().with_confidence(f64::NAN).validate(),
        Err(CandidateError::ConfidenceOutOfRange { .. })
    ));
}

#[test]
fn test_validate_entity_confidence_range() {
    let candidate = QACandidate::new("Q?", "A", ExtractionMethod::DefinitionExtraction)
        .with_confidence(0.9)
        .with_entity(Entity::new("term", "hull", 0.9))
        .with_entity(Entity::new("term", "p&i", -0.1));

    match candidate.validate() {
        Err(CandidateError::EntityConfidenceOutOfRange { index, .. }) => assert_eq!(index, 1),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_empty_text_is_not_invalid() {
    let candidate = QACandidate::new("", "   ", ExtractionMethod::FaqPattern).with_confidence(1.0);
    assert!(candidate.validate().is_ok());
}

fn verdict(flags: &[QualityFlag], reason: Option<QualityFlag>) -> ValidatedCandidate {
    let candidate = QACandidate::new("What is towing cover?", "It pays for towing.", ExtractionMethod::FaqPattern)
        .with_confidence(0.9);
    ValidatedCandidate::new(
        candidate,
        fingerprint("What is towing cover?"),
        fingerprint("It pays for towing."),
        flags.iter().copied().collect::<BTreeSet<_>>(),
        reason,
        None,
    )
}

#[test]
fn test_validated_candidate_approval_tracks_reason() {
    let approved = verdict(&[], None);
    assert!(approved.is_approved());
    assert!(approved.rejection_reason().is_none());

    let rejected = verdict(&[QualityFlag::LowConfidence], Some(QualityFlag::LowConfidence));
    assert!(!rejected.is_approved());
    assert_eq!(rejected.rejection_reason(), Some(QualityFlag::LowConfidence));
}

#[test]
fn test_validated_candidate_json_shape() {
    let rejected = verdict(
        &[QualityFlag::TooShort, QualityFlag::DuplicateExact],
        Some(QualityFlag::DuplicateExact),
    );
    let value = serde_json::to_value(&rejected).expect("serialize");

    assert_eq!(value["question"], "What is towing cover?");
    assert_eq!(value["extraction_method"], "faq_pattern");
    assert_eq!(value["is_approved"], false);
    assert_eq!(value["rejection_reason"], "DUPLICATE_EXACT");
    assert_eq!(
        value["quality_flags"],
        serde_json::json!(["DUPLICATE_EXACT", "TOO_SHORT"])
    );
    assert_eq!(value["question_hash"].as_str().map(str::len), Some(64));
    assert!(value.get("duplicate_of").is_none());

    let approved = serde_json::to_value(verdict(&[], None)).expect("serialize");
    assert!(approved.get("rejection_reason").is_none());
    assert!(approved.get("regions").is_none());
}

#[test]
fn test_validated_candidate_regions_round_trip() {
    let regional = verdict(&[QualityFlag::RegionSpecific], None)
        .with_regions(BTreeSet::from([Region::Uk, Region::Eu]));
    assert!(regional.is_approved());

    let value = serde_json::to_value(&regional).expect("serialize");
    assert_eq!(value["regions"], serde_json::json!(["UK", "EU"]));

    let back: ValidatedCandidate = serde_json::from_value(value).expect("deserialize");
    assert_eq!(back, regional);
}

#[test]
fn test_into_candidate_returns_the_input() {
    let verdict = verdict(&[QualityFlag::TooShort], None);
    let candidate = verdict.clone().into_candidate();

    assert_eq!(&candidate, verdict.candidate());
    assert_eq!(candidate.question, "What is towing cover?");
    assert_eq!(candidate.extraction_method, ExtractionMethod::FaqPattern);
}

#[test]
fn test_from_json_slice_rejects_invalid_utf8() {
    let bytes = b"{\"question\": \"Q\xff?\", \"answer\": \"A.\", \"extractionMethod\": \"faq_pattern\"}";
    assert!(matches!(
        QACandidate::from_json_slice(bytes),
        Err(CandidateError::Malformed(_))
    ));

    let valid = br#"{"question": "Q?", "answer": "A.", "extractionMethod": "faq_pattern"}"#;
    assert_eq!(QACandidate::from_json_slice(valid).expect("valid").question, "Q?");
}

#[test]
fn test_quality_score_clean_faq() {
    // 100 + round(0.4 * 10) + 15, clamped.
    assert_eq!(verdict(&[], None).quality_score(), 100);
}

#[test]
fn test_quality_score_penalties() {
    let scored = verdict(&[QualityFlag::TooShort], None);
    // 100 - 25 + 4 + 15
    assert_eq!(scored.quality_score(), 94);

    let junk = verdict(
        &[QualityFlag::DuplicateExact, QualityFlag::LegalAdvice],
        Some(QualityFlag::DuplicateExact),
    );
    assert_eq!(junk.quality_score(), 0);
}
