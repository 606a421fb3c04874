//! Store-level tests: seeding idempotence, decision recording, apply
//! idempotence and traceability, persistence across reopen.

use accord_core::types::{
    DecisionStatus, InconsistencyKind, InconsistencyRecord, RatingValue, SurveyRow,
};
use accord_storage::ValidationStore;

fn record(case_id: &str, rating: RatingValue, suggested: RatingValue) -> InconsistencyRecord {
    InconsistencyRecord {
        case_id: case_id.to_string(),
        rater: "agent-1".to_string(),
        rating,
        comment: "comment".to_string(),
        kind: InconsistencyKind::PositiveRatingNegativeComment,
        signals: vec!["catastrophic".to_string()],
        suggested_rating: suggested,
    }
}

fn row(case_id: &str, rating: RatingValue) -> SurveyRow {
    SurveyRow::new(case_id, "agent-1", "site-a", rating, Some("comment".to_string()))
}

#[test]
fn load_detected_is_idempotent() {
    let store = ValidationStore::open_in_memory().unwrap();
    let records = vec![
        record("C-1", RatingValue::VerySatisfied, RatingValue::Unsatisfied),
        record("C-2", RatingValue::Satisfied, RatingValue::Unsatisfied),
    ];
    assert_eq!(store.load_detected(&records).unwrap(), 2);
    assert_eq!(store.load_detected(&records).unwrap(), 0);
    assert_eq!(store.summary().unwrap().pending, 2);
}

#[test]
fn decisions_survive_a_reseed() {
    let store = ValidationStore::open_in_memory().unwrap();
    let records = vec![record("C-1", RatingValue::Satisfied, RatingValue::Unsatisfied)];
    store.load_detected(&records).unwrap();
    assert!(store.validate("C-1", RatingValue::Unsatisfied, "clear complaint", "qa").unwrap());

    store.load_detected(&records).unwrap();
    let decision = store.get_decision("C-1").unwrap().unwrap();
    assert_eq!(decision.status, DecisionStatus::Validated);
}

#[test]
fn decide_unknown_case_is_not_found() {
    let store = ValidationStore::open_in_memory().unwrap();
    assert!(!store.validate("C-404", RatingValue::Satisfied, "", "qa").unwrap());
    assert!(!store.ignore("C-404", "", "qa").unwrap());
}

#[test]
fn ignore_keeps_the_original_rating_but_stamps_the_row() {
    let store = ValidationStore::open_in_memory().unwrap();
    store
        .load_detected(&[record("C-1", RatingValue::VerySatisfied, RatingValue::Unsatisfied)])
        .unwrap();
    assert!(store.ignore("C-1", "kept as-is", "qa").unwrap());

    let mut rows = vec![row("C-1", RatingValue::VerySatisfied)];
    assert_eq!(store.apply_to(&mut rows).unwrap(), 1);

    assert_eq!(rows[0].rating, RatingValue::VerySatisfied);
    assert_eq!(rows[0].original_rating, Some(RatingValue::VerySatisfied));
    assert!(rows[0].validation_applied);
    assert_eq!(rows[0].validation_reason, "kept as-is");
    assert!(rows[0].validation_decided_at.is_some());
}

#[test]
fn validated_decision_rewrites_the_rating() {
    let store = ValidationStore::open_in_memory().unwrap();
    store
        .load_detected(&[record("C-1", RatingValue::Satisfied, RatingValue::Unsatisfied)])
        .unwrap();
    store.validate("C-1", RatingValue::Unsatisfied, "", "qa").unwrap();

    let mut rows = vec![row("C-1", RatingValue::Satisfied)];
    store.apply_to(&mut rows).unwrap();

    assert_eq!(rows[0].rating, RatingValue::Unsatisfied);
    assert_eq!(rows[0].original_rating, Some(RatingValue::Satisfied));
    assert!(rows[0].validation_applied);
    // Empty reason gets the default stamp.
    assert_eq!(rows[0].validation_reason, "correction applied");
}

#[test]
fn apply_to_is_idempotent() {
    let store = ValidationStore::open_in_memory().unwrap();
    store
        .load_detected(&[record("C-1", RatingValue::Satisfied, RatingValue::Unsatisfied)])
        .unwrap();
    store.validate("C-1", RatingValue::Unsatisfied, "complaint", "qa").unwrap();

    let mut rows = vec![
        row("C-1", RatingValue::Satisfied),
        row("C-2", RatingValue::VerySatisfied),
    ];
    store.apply_to(&mut rows).unwrap();
    let after_first = rows.clone();
    store.apply_to(&mut rows).unwrap();

    assert_eq!(rows, after_first);
    assert_eq!(rows[0].original_rating, Some(RatingValue::Satisfied));
    // Untouched rows stay untouched.
    assert!(!rows[1].validation_applied);
}

#[test]
fn apply_to_matches_by_case_id_regardless_of_subsetting() {
    let store = ValidationStore::open_in_memory().unwrap();
    store
        .load_detected(&[
            record("C-1", RatingValue::Satisfied, RatingValue::Unsatisfied),
            record("C-2", RatingValue::VerySatisfied, RatingValue::Unsatisfied),
        ])
        .unwrap();
    store.validate("C-1", RatingValue::Unsatisfied, "", "qa").unwrap();
    store.validate("C-2", RatingValue::Unsatisfied, "", "qa").unwrap();

    // Filtered, reordered view of the dataset.
    let mut subset = vec![row("C-2", RatingValue::VerySatisfied)];
    store.apply_to(&mut subset).unwrap();
    assert_eq!(subset[0].rating, RatingValue::Unsatisfied);
}

#[test]
fn pending_and_all_listings() {
    let store = ValidationStore::open_in_memory().unwrap();
    store
        .load_detected(&[
            record("C-1", RatingValue::Satisfied, RatingValue::Unsatisfied),
            record("C-2", RatingValue::Satisfied, RatingValue::Unsatisfied),
        ])
        .unwrap();
    store.validate("C-1", RatingValue::Unsatisfied, "", "qa").unwrap();

    let pending = store.list_pending().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].case_id, "C-2");
    assert_eq!(store.list_all().unwrap().len(), 2);

    let summary = store.summary().unwrap();
    assert_eq!(summary.validated, 1);
    assert_eq!(summary.pending, 1);
    assert_eq!(summary.completion_rate, 50.0);
}

#[test]
fn store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("accord.db");

    {
        let store = ValidationStore::open(&db_path).unwrap();
        store
            .load_detected(&[record("C-1", RatingValue::Satisfied, RatingValue::Unsatisfied)])
            .unwrap();
        store.validate("C-1", RatingValue::Unsatisfied, "persisted", "qa").unwrap();
    }

    let reopened = ValidationStore::open(&db_path).unwrap();
    let decision = reopened.get_decision("C-1").unwrap().unwrap();
    assert_eq!(decision.status, DecisionStatus::Validated);
    assert_eq!(decision.reason, "persisted");
    assert_eq!(reopened.summary().unwrap().completion_rate, 100.0);
}

#[test]
fn purge_drops_old_decisions() {
    let store = ValidationStore::open_in_memory().unwrap();
    store
        .load_detected(&[record("C-1", RatingValue::Satisfied, RatingValue::Unsatisfied)])
        .unwrap();
    // Nothing is older than a day.
    assert_eq!(store.purge_older_than(1).unwrap(), 0);
    assert_eq!(store.summary().unwrap().total, 1);
}
