//! Shared-gate behavior under concurrent submission.

mod common;

use std::sync::{Arc, Barrier};
use std::thread;

use common::fixtures::{CandidateBuilder, distinct_candidates};
use keel::gate::{GateConfig, QualityGate};
use keel::index::InMemoryDuplicateIndex;
use keel::rules::QualityFlag;

const THREADS: usize = 16;

#[test]
fn test_racing_identical_candidates_yield_one_first_sighting() {
    let gate = Arc::new(QualityGate::new(
        InMemoryDuplicateIndex::new(),
        GateConfig::default(),
    ));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let gate = Arc::clone(&gate);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let candidate = CandidateBuilder::new().build();
                barrier.wait();
                gate.evaluate(candidate).expect("verdict")
            })
        })
        .collect();

    let verdicts: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("worker panicked"))
        .collect();

    let approved = verdicts.iter().filter(|v| v.is_approved()).count();
    let exact = verdicts
        .iter()
        .filter(|v| v.rejection_reason() == Some(QualityFlag::DuplicateExact))
        .count();

    assert_eq!(approved, 1);
    assert_eq!(exact, THREADS - 1);
    assert_eq!(gate.index().len(), 1);
}

#[test]
fn test_distinct_candidates_in_parallel_are_all_approved() {
    let index = Arc::new(InMemoryDuplicateIndex::new());
    let gate = Arc::new(QualityGate::new(Arc::clone(&index), GateConfig::default()));

    let handles: Vec<_> = distinct_candidates(THREADS * 4)
        .chunks(4)
        .map(|chunk| {
            let gate = Arc::clone(&gate);
            let chunk = chunk.to_vec();
            thread::spawn(move || gate.evaluate_batch(chunk))
        })
        .collect();

    for handle in handles {
        for result in handle.join().expect("worker panicked") {
            let verdict = result.expect("verdict");
            assert!(verdict.is_approved());
            assert!(verdict.quality_flags().is_empty());
        }
    }

    assert_eq!(index.len(), THREADS * 4);
    assert_eq!(index.answer_count(), THREADS * 4);
}

#[test]
fn test_shared_answer_across_threads() {
    let gate = Arc::new(QualityGate::new(
        InMemoryDuplicateIndex::new(),
        GateConfig::default(),
    ));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let gate = Arc::clone(&gate);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let candidate = CandidateBuilder::new()
                    .question(&format!("Clause {i}?"))
                    .build();
                barrier.wait();
                gate.evaluate(candidate).expect("verdict")
            })
        })
        .collect();

    let reused = handles
        .into_iter()
        .map(|h| h.join().expect("worker panicked"))
        .filter(|v| v.has_flag(QualityFlag::DuplicateAnswer))
        .count();

    assert_eq!(reused, THREADS - 1);
}
