//! Review session tests: state transitions, the fail-closed gate, and
//! end-to-end detect → decide → apply.

use accord_analysis::InconsistencyDetector;
use accord_core::errors::{EngineError, ReviewError};
use accord_core::types::{RatingValue, SurveyRow};
use accord_review::{BatchState, ReviewSession};
use accord_storage::ValidationStore;

fn row(case_id: &str, rating: RatingValue, comment: &str) -> SurveyRow {
    SurveyRow::new(case_id, "agent-1", "site-a", rating, Some(comment.to_string()))
}

fn sample_batch() -> Vec<SurveyRow> {
    vec![
        // Praise under a negative rating.
        row(
            "C-1",
            RatingValue::Unsatisfied,
            "Thank you, excellent and efficient service",
        ),
        // Pure complaint under a positive rating.
        row(
            "C-2",
            RatingValue::Satisfied,
            "Catastrophic service, unacceptable attitude",
        ),
        // Consistent row, never flagged.
        row(
            "C-3",
            RatingValue::VerySatisfied,
            "The problem was resolved quickly",
        ),
    ]
}

#[test]
fn detect_moves_to_awaiting_review() {
    let store = ValidationStore::open_in_memory().unwrap();
    let mut session = ReviewSession::new(&store, InconsistencyDetector::new().unwrap());
    assert_eq!(session.state(), BatchState::Detecting);

    let records = session.detect(&sample_batch()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(session.state(), BatchState::AwaitingReview);
    assert_eq!(session.pending().unwrap().len(), 2);
}

#[test]
fn clean_batch_resolves_immediately() {
    let store = ValidationStore::open_in_memory().unwrap();
    let mut session = ReviewSession::new(&store, InconsistencyDetector::new().unwrap());

    let records = session
        .detect(&[row(
            "C-3",
            RatingValue::VerySatisfied,
            "The problem was resolved quickly",
        )])
        .unwrap();
    assert!(records.is_empty());
    assert_eq!(session.state(), BatchState::Resolved);
    session.ensure_resolved().unwrap();
}

#[test]
fn ensure_resolved_blocks_with_case_ids() {
    let store = ValidationStore::open_in_memory().unwrap();
    let mut session = ReviewSession::new(&store, InconsistencyDetector::new().unwrap());
    session.detect(&sample_batch()).unwrap();

    let err = session.ensure_resolved().unwrap_err();
    match err {
        ReviewError::UnresolvedInconsistencies { case_ids } => {
            assert_eq!(case_ids.len(), 2);
            assert!(case_ids.contains(&"C-1".to_string()));
            assert!(case_ids.contains(&"C-2".to_string()));
        }
        other => panic!("expected UnresolvedInconsistencies, got {other:?}"),
    }
}

#[test]
fn apply_refuses_while_pending() {
    let store = ValidationStore::open_in_memory().unwrap();
    let mut session = ReviewSession::new(&store, InconsistencyDetector::new().unwrap());
    let mut rows = sample_batch();
    session.detect(&rows).unwrap();

    let err = session.apply(&mut rows).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Review(ReviewError::UnresolvedInconsistencies { .. })
    ));
    // Nothing was stamped.
    assert!(rows.iter().all(|r| !r.validation_applied));
}

#[test]
fn full_review_cycle_applies_decisions() {
    let store = ValidationStore::open_in_memory().unwrap();
    let mut session = ReviewSession::new(&store, InconsistencyDetector::new().unwrap());
    let mut rows = sample_batch();
    session.detect(&rows).unwrap();

    session
        .validate("C-1", RatingValue::Satisfied, "praise is genuine", "qa")
        .unwrap();
    assert_eq!(session.state(), BatchState::AwaitingReview);
    session.ignore("C-2", "sarcasm, rating stands", "qa").unwrap();
    assert_eq!(session.state(), BatchState::Resolved);

    let stamped = session.apply(&mut rows).unwrap();
    assert_eq!(stamped, 2);

    assert_eq!(rows[0].rating, RatingValue::Satisfied);
    assert_eq!(rows[0].original_rating, Some(RatingValue::Unsatisfied));
    assert_eq!(rows[0].validation_reason, "praise is genuine");

    assert_eq!(rows[1].rating, RatingValue::Satisfied);
    assert_eq!(rows[1].original_rating, Some(RatingValue::Satisfied));
    assert!(rows[1].validation_applied);

    assert!(!rows[2].validation_applied);
}

#[test]
fn deciding_an_unknown_case_is_an_error() {
    let store = ValidationStore::open_in_memory().unwrap();
    let mut session = ReviewSession::new(&store, InconsistencyDetector::new().unwrap());
    session.detect(&sample_batch()).unwrap();

    let err = session
        .validate("C-404", RatingValue::Satisfied, "", "qa")
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Review(ReviewError::DecisionNotFound { .. })
    ));
    let err = session.ignore("C-404", "", "qa").unwrap_err();
    assert!(matches!(
        err,
        EngineError::Review(ReviewError::DecisionNotFound { .. })
    ));
}

#[test]
fn redetection_never_reopens_decided_cases() {
    let store = ValidationStore::open_in_memory().unwrap();
    let mut session = ReviewSession::new(&store, InconsistencyDetector::new().unwrap());
    let rows = sample_batch();
    session.detect(&rows).unwrap();
    session
        .validate("C-1", RatingValue::Satisfied, "", "qa")
        .unwrap();
    session.ignore("C-2", "", "qa").unwrap();
    assert_eq!(session.state(), BatchState::Resolved);

    // Re-upload of the same batch.
    session.detect(&rows).unwrap();
    assert_eq!(session.state(), BatchState::Resolved);
    session.ensure_resolved().unwrap();
}

#[test]
fn two_sessions_share_the_store() {
    let store = ValidationStore::open_in_memory().unwrap();
    let mut first = ReviewSession::new(&store, InconsistencyDetector::new().unwrap());
    first.detect(&sample_batch()).unwrap();

    // A second surface over the same store sees and resolves the work.
    let mut second = ReviewSession::new(&store, InconsistencyDetector::new().unwrap());
    second.detect(&sample_batch()).unwrap();
    second
        .validate("C-1", RatingValue::Satisfied, "", "qa")
        .unwrap();
    second.ignore("C-2", "", "qa").unwrap();

    first.ensure_resolved().unwrap();
}
