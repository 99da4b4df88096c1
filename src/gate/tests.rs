use super::*;
use crate::candidate::{CandidateError, Entity, ExtractionMethod, QACandidate};
use crate::index::{InMemoryDuplicateIndex, IndexError, MockDuplicateIndex};
use crate::rules::{QualityFlag, Region, RuleConfig, RuleEngine, suggest_edits};
use std::collections::BTreeSet;
use std::sync::Arc;

const HULL_QUESTION: &str = "What is hull insurance?";
const HULL_ANSWER: &str = "Hull insurance covers physical damage to the vessel's structure, \
    machinery, and equipment, including the engine, sails, masts and permanently attached \
    fittings, after perils such as collision, grounding, fire or storm.";

fn clean_candidate() -> QACandidate {
    QACandidate::new(HULL_QUESTION, HULL_ANSWER, ExtractionMethod::FaqPattern)
        .with_confidence(0.9)
        .with_entity(Entity::new("term", "hull insurance", 0.95))
}

fn gate() -> QualityGate<InMemoryDuplicateIndex> {
    QualityGate::new(InMemoryDuplicateIndex::new(), GateConfig::default())
}

fn flags(list: &[QualityFlag]) -> BTreeSet<QualityFlag> {
    list.iter().copied().collect()
}

#[test]
fn test_rejection_reason_no_flags() {
    assert_eq!(rejection_reason(&BTreeSet::new(), 2), None);
}

#[test]
fn test_rejection_reason_fatal_priority() {
    let all_fatal = flags(&[
        QualityFlag::LegalAdvice,
        QualityFlag::LowConfidence,
        QualityFlag::EmptyContent,
        QualityFlag::DuplicateExact,
    ]);
    assert_eq!(rejection_reason(&all_fatal, 2), Some(QualityFlag::DuplicateExact));

    let empty_and_low = flags(&[QualityFlag::LowConfidence, QualityFlag::EmptyContent]);
    assert_eq!(rejection_reason(&empty_and_low, 2), Some(QualityFlag::EmptyContent));
}

#[test]
fn test_rejection_reason_fatal_beats_soft_pile() {
    let mixed = flags(&[
        QualityFlag::TooShort,
        QualityFlag::NoEntities,
        QualityFlag::DuplicateQuestion,
        QualityFlag::LowConfidence,
    ]);
    assert_eq!(rejection_reason(&mixed, 2), Some(QualityFlag::LowConfidence));
}

#[test]
fn test_rejection_reason_soft_threshold_boundary() {
    let one = flags(&[QualityFlag::TooShort]);
    let two = flags(&[QualityFlag::TooShort, QualityFlag::DuplicateQuestion]);

    assert_eq!(rejection_reason(&one, 2), None);
    assert_eq!(rejection_reason(&two, 2), Some(QualityFlag::DuplicateQuestion));

    let three = flags(&[QualityFlag::TooShort, QualityFlag::NoEntities, QualityFlag::TooLong]);
    assert_eq!(rejection_reason(&two, 3), None);
    assert_eq!(rejection_reason(&three, 3), Some(QualityFlag::TooShort));
}

#[test]
fn test_rejection_reason_ignores_informational_flags() {
    let region_only = flags(&[QualityFlag::RegionSpecific]);
    assert_eq!(rejection_reason(&region_only, 1), None);

    let region_and_soft = flags(&[QualityFlag::RegionSpecific, QualityFlag::TooShort]);
    assert_eq!(rejection_reason(&region_and_soft, 2), None);
    assert_eq!(rejection_reason(&region_and_soft, 1), Some(QualityFlag::TooShort));
}

#[test]
fn test_clean_candidate_approved() {
    let verdict = gate().evaluate(clean_candidate()).expect("verdict");

    assert!(verdict.is_approved());
    assert!(verdict.quality_flags().is_empty());
    assert!(verdict.rejection_reason().is_none());
    assert!(verdict.duplicate_of().is_none());
    assert_eq!(verdict.question_hash(), &crate::hashing::fingerprint(HULL_QUESTION));
    assert_eq!(verdict.answer_hash(), &crate::hashing::fingerprint(HULL_ANSWER));
}

#[test]
fn test_second_submission_is_exact_duplicate() {
    let gate = gate();
    let first = gate.evaluate(clean_candidate()).expect("first");
    let second = gate.evaluate(clean_candidate()).expect("second");

    assert!(!first.has_flag(QualityFlag::DuplicateExact));
    assert!(first.is_approved());

    assert!(second.has_flag(QualityFlag::DuplicateExact));
    assert!(!second.is_approved());
    assert_eq!(second.rejection_reason(), Some(QualityFlag::DuplicateExact));
    assert_eq!(second.duplicate_of(), Some(crate::index::CandidateRef::new(0)));
    assert_eq!(first.question_hash(), second.question_hash());
}

#[test]
fn test_reanswered_question_is_soft() {
    let gate = gate();
    gate.evaluate(clean_candidate()).expect("first");

    let mut reanswer = clean_candidate();
    reanswer.answer = format!("{HULL_ANSWER} Theft of the tender is usually included as well.");
    let verdict = gate.evaluate(reanswer).expect("second");

    assert_eq!(verdict.quality_flags(), &flags(&[QualityFlag::DuplicateQuestion]));
    assert!(verdict.is_approved());
}

#[test]
fn test_soft_threshold_boundary_through_gate() {
    let gate = gate();

    let mut one_soft = clean_candidate();
    one_soft.answer = "Hull insurance covers physical damage to the vessel.".to_string();
    let verdict = gate.evaluate(one_soft).expect("one soft");
    assert_eq!(verdict.quality_flags(), &flags(&[QualityFlag::TooShort]));
    assert!(verdict.is_approved());

    let mut two_soft = clean_candidate();
    two_soft.question = "Machinery cover explained".to_string();
    two_soft.answer = "Machinery cover pays for engine breakdown.".to_string();
    let verdict = gate.evaluate(two_soft).expect("two soft");
    assert_eq!(
        verdict.quality_flags(),
        &flags(&[QualityFlag::TooShort, QualityFlag::UnclearQuestion])
    );
    assert!(!verdict.is_approved());
    assert_eq!(verdict.rejection_reason(), Some(QualityFlag::TooShort));
}

#[test]
fn test_configurable_soft_threshold() {
    let gate = QualityGate::new(
        InMemoryDuplicateIndex::new(),
        GateConfig::default().with_soft_flag_threshold(3),
    );

    let mut two_soft = clean_candidate();
    two_soft.question = "Machinery cover explained".to_string();
    two_soft.answer = "Machinery cover pays for engine breakdown.".to_string();

    assert!(gate.evaluate(two_soft).expect("verdict").is_approved());
    assert_eq!(gate.soft_flag_threshold(), 3);
}

#[test]
fn test_empty_answer_rejected_even_at_full_confidence() {
    let mut candidate = clean_candidate().with_confidence(1.0);
    candidate.answer = String::new();

    let verdict = gate().evaluate(candidate).expect("verdict");
    assert!(verdict.has_flag(QualityFlag::EmptyContent));
    assert!(!verdict.is_approved());
    assert_eq!(verdict.rejection_reason(), Some(QualityFlag::EmptyContent));
}

#[test]
fn test_duplicate_beats_empty_content() {
    let gate = gate();
    let empty = QACandidate::new("", "", ExtractionMethod::FaqPattern).with_confidence(1.0);

    let first = gate.evaluate(empty.clone()).expect("first");
    assert_eq!(first.rejection_reason(), Some(QualityFlag::EmptyContent));

    let second = gate.evaluate(empty).expect("second");
    assert!(second.has_flag(QualityFlag::EmptyContent));
    assert_eq!(second.rejection_reason(), Some(QualityFlag::DuplicateExact));
}

#[test]
fn test_invalid_candidate_does_not_touch_index() {
    let gate = QualityGate::new(MockDuplicateIndex::new(), GateConfig::default());
    let result = gate.evaluate(clean_candidate().with_confidence(7.0));

    assert!(matches!(
        result,
        Err(GateError::InvalidCandidate(CandidateError::ConfidenceOutOfRange { .. }))
    ));
    assert_eq!(gate.index().call_count(), 0);
}

#[test]
fn test_evaluate_json_missing_answer() {
    let result = gate().evaluate_json(r#"{"question": "Q?", "extractionMethod": "faq_pattern"}"#);
    assert!(matches!(
        result,
        Err(GateError::InvalidCandidate(CandidateError::Malformed(_)))
    ));
}

#[test]
fn test_evaluate_json_clean() {
    let json = serde_json::to_string(&clean_candidate()).expect("serialize");
    let verdict = gate().evaluate_json(&json).expect("verdict");
    assert!(verdict.is_approved());
}

#[test]
fn test_index_failure_is_an_error_not_a_verdict() {
    let gate = QualityGate::new(MockDuplicateIndex::unavailable(), GateConfig::default());
    let result = gate.evaluate(clean_candidate());

    assert!(matches!(
        result,
        Err(GateError::DuplicateCheckFailed(IndexError::Unavailable { .. }))
    ));

    gate.index().set_available(true);
    assert!(gate.evaluate(clean_candidate()).expect("verdict").is_approved());
}

#[test]
fn test_evaluate_batch_preserves_order() {
    let gate = gate();
    let mut other = clean_candidate();
    other.question = "What does hull insurance exclude?".to_string();
    other.answer = "Hull insurance usually excludes wear and tear, gradual deterioration, \
        marine growth, osmosis and damage caused by a lack of reasonable maintenance."
        .to_string();

    let results = gate.evaluate_batch(vec![
        clean_candidate(),
        other,
        clean_candidate(),
        clean_candidate().with_confidence(-1.0),
    ]);

    assert_eq!(results.len(), 4);
    assert!(results[0].as_ref().expect("first").is_approved());
    assert!(results[1].as_ref().expect("second").is_approved());
    assert_eq!(
        results[2].as_ref().expect("third").rejection_reason(),
        Some(QualityFlag::DuplicateExact)
    );
    assert!(results[3].is_err());

    let summary = GateSummary::from_results(&results);
    assert_eq!(summary.total, 4);
    assert_eq!(summary.approved, 2);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.rejections_by_reason.get(&QualityFlag::DuplicateExact), Some(&1));
    assert!((summary.approval_rate() - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(
        summary.to_string(),
        "4 candidates: 2 approved, 1 rejected, 1 errors (DUPLICATE_EXACT=1)"
    );

    let approved = approved_only(results.into_iter().filter_map(Result::ok));
    assert_eq!(approved.len(), 2);
}

#[test]
fn test_summary_counts_flags_on_approved() {
    let gate = gate();
    let mut short = clean_candidate();
    short.answer = "Hull insurance covers physical damage to the vessel.".to_string();

    let verdict = gate.evaluate(short).expect("verdict");
    let mut summary = GateSummary::new();
    summary.record(&verdict);

    assert_eq!(summary.approved, 1);
    assert_eq!(summary.flag_counts.get(&QualityFlag::TooShort), Some(&1));
    assert!(summary.rejections_by_reason.is_empty());
    assert_eq!(GateSummary::new().approval_rate(), 0.0);
}

#[test]
fn test_summary_serializes_flag_keys() {
    let mut summary = GateSummary::new();
    summary
        .rejections_by_reason
        .insert(QualityFlag::LowConfidence, 3);
    let value = serde_json::to_value(&summary).expect("serialize");
    assert_eq!(value["rejections_by_reason"]["LOW_CONFIDENCE"], 3);
}

#[test]
fn test_custom_engine() {
    let gate = QualityGate::with_engine(
        InMemoryDuplicateIndex::new(),
        RuleEngine::empty(RuleConfig::default()),
        2,
    );
    let candidate = QACandidate::new("", "", ExtractionMethod::FaqPattern);
    assert!(gate.evaluate(candidate).expect("verdict").is_approved());
    assert!(gate.engine().is_empty());
}

#[test]
fn test_gate_shared_across_threads() {
    let gate = Arc::new(gate());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let gate = Arc::clone(&gate);
            std::thread::spawn(move || gate.evaluate(clean_candidate()).expect("verdict"))
        })
        .collect();

    let approved = handles
        .into_iter()
        .map(|h| h.join().expect("worker panicked"))
        .filter(|v| v.is_approved())
        .count();
    assert_eq!(approved, 1);
}

#[test]
fn test_gate_config_validate() {
    assert!(GateConfig::default().validate().is_ok());

    let zero = GateConfig::default().with_soft_flag_threshold(0);
    assert!(matches!(
        zero.validate(),
        Err(crate::config::ConfigError::Zero { .. })
    ));

    for similarity in [0.0, 1.5, f64::NAN] {
        let config = GateConfig {
            near_duplicate_similarity: similarity,
            ..GateConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(crate::config::ConfigError::SimilarityOutOfRange { .. })
        ));
    }

    let exact_only = GateConfig {
        near_duplicate_similarity: 1.0,
        ..GateConfig::default()
    };
    assert!(exact_only.validate().is_ok());
}

#[test]
fn test_split_lines_keeps_line_numbers() {
    let input = b"first\r\n\n   \nsecond\n\xff\xfe\nthird";
    let lines = split_lines(input);

    let numbers: Vec<usize> = lines.iter().map(|l| l.number).collect();
    assert_eq!(numbers, vec![1, 4, 5, 6]);
    assert_eq!(lines[0].bytes, b"first");
    assert_eq!(lines[2].bytes, b"\xff\xfe");
    assert!(split_lines(b"").is_empty());
}

#[test]
fn test_undecodable_lines_are_counted_not_fatal() {
    let gate = gate();
    let clean = serde_json::to_string(&clean_candidate()).expect("serialize");

    let mut input = Vec::new();
    input.extend_from_slice(b"not json\n");
    input.extend_from_slice(b"{\"question\": \"Hull \xff cover?\", \"answer\": \"x\", \"extractionMethod\": \"faq_pattern\"}\n");
    input.extend_from_slice(b"\xc3\x28\n");
    input.extend_from_slice(clean.as_bytes());
    input.push(b'\n');

    let results: Vec<_> = split_lines(&input)
        .into_iter()
        .map(|line| (line.number, gate.evaluate_json_slice(&line.bytes)))
        .collect();
    assert!(matches!(
        results[1].1,
        Err(GateError::InvalidCandidate(CandidateError::Malformed(_)))
    ));

    let (output, summary) = render_verdicts(&results).expect("render");
    assert_eq!(summary.total, 4);
    assert_eq!(summary.errors, 3);
    assert_eq!(summary.approved, 1);

    let rendered: Vec<&[u8]> = output.split(|b| *b == b'\n').filter(|l| !l.is_empty()).collect();
    assert_eq!(rendered.len(), 1);
    let verdict: serde_json::Value = serde_json::from_slice(rendered[0]).expect("verdict line");
    assert_eq!(verdict["question"], HULL_QUESTION);
    assert_eq!(gate.index().len(), 1);
}

#[test]
fn test_regional_answer_is_approved_with_regions() {
    let mut candidate = clean_candidate();
    candidate.answer = format!("{HULL_ANSWER} In US waters, USCG rules on fire extinguishers apply.");

    let verdict = gate().evaluate(candidate).expect("verdict");
    assert!(verdict.is_approved());
    assert_eq!(verdict.quality_flags(), &flags(&[QualityFlag::RegionSpecific]));
    assert_eq!(verdict.regions(), &BTreeSet::from([Region::Us]));
}

#[test]
fn test_suggest_edits_for_flagged_verdict() {
    let candidate = QACandidate::new(
        "Is towing covered in UK waters!",
        "Towing to the nearest safe haven is covered after a breakdown. Call now for a free quote!",
        ExtractionMethod::FaqPattern,
    )
    .with_confidence(0.9);

    let verdict = gate().evaluate(candidate).expect("verdict");
    assert!(verdict.has_flag(QualityFlag::MarketingTone));
    assert!(verdict.has_flag(QualityFlag::UnclearQuestion));

    let edits = suggest_edits(&verdict);
    assert_eq!(edits.question, "Is towing covered in UK waters (UK)?");
    assert_eq!(
        edits.answer,
        "Towing to the nearest safe haven is covered after a breakdown."
    );
    assert_eq!(
        edits.improvements,
        vec![
            "Removed marketing language",
            "Standardized question format",
            "Added regional context: UK",
        ]
    );
}

#[test]
fn test_suggest_edits_for_clean_verdict() {
    let verdict = gate().evaluate(clean_candidate()).expect("verdict");
    let edits = suggest_edits(&verdict);

    assert!(edits.is_empty());
    assert_eq!(edits.question, HULL_QUESTION);
    assert_eq!(edits.answer, HULL_ANSWER);
}
