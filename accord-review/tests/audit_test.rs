//! Audit log round-trip: export, serialize, import into a fresh store,
//! and compare summaries and decisions.

use accord_analysis::InconsistencyDetector;
use accord_core::types::{DecisionStatus, RatingValue, SurveyRow};
use accord_review::{audit, AuditLog, ReviewSession};
use accord_storage::ValidationStore;

fn row(case_id: &str, rating: RatingValue, comment: &str) -> SurveyRow {
    SurveyRow::new(case_id, "agent-1", "site-a", rating, Some(comment.to_string()))
}

fn reviewed_store() -> ValidationStore {
    let store = ValidationStore::open_in_memory().unwrap();
    let mut session = ReviewSession::new(&store, InconsistencyDetector::new().unwrap());
    session
        .detect(&[
            row(
                "C-1",
                RatingValue::Unsatisfied,
                "Thank you, excellent and efficient service",
            ),
            row(
                "C-2",
                RatingValue::Satisfied,
                "Catastrophic service, unacceptable attitude",
            ),
            row(
                "C-3",
                RatingValue::Satisfied,
                "Great service but I expected better",
            ),
        ])
        .unwrap();
    session
        .validate("C-1", RatingValue::Satisfied, "praise is genuine", "qa")
        .unwrap();
    session.ignore("C-2", "sarcasm, rating stands", "qa").unwrap();
    // C-3 stays pending; the log carries it anyway.
    drop(session);
    store
}

#[test]
fn export_carries_every_decision() {
    let store = reviewed_store();
    let log = audit::export_log(&store).unwrap();

    assert_eq!(log.decisions.len(), 3);
    assert_eq!(log.summary.total, 3);
    assert_eq!(log.summary.validated, 1);
    assert_eq!(log.summary.ignored, 1);
    assert_eq!(log.summary.pending, 1);
    assert!(log.exported_at > 0);
}

#[test]
fn json_roundtrip_preserves_the_log() {
    let store = reviewed_store();
    let log = audit::export_log(&store).unwrap();

    let raw = log.to_json().unwrap();
    let parsed = AuditLog::from_json(&raw).unwrap();
    assert_eq!(parsed, log);
}

#[test]
fn import_into_fresh_store_yields_identical_state() {
    let store = reviewed_store();
    let log = audit::export_log(&store).unwrap();

    let fresh = ValidationStore::open_in_memory().unwrap();
    log.import_into(&fresh).unwrap();

    let reexported = audit::export_log(&fresh).unwrap();
    assert_eq!(reexported.summary, log.summary);
    assert_eq!(reexported.decisions, log.decisions);

    let c1 = fresh.get_decision("C-1").unwrap().unwrap();
    assert_eq!(c1.status, DecisionStatus::Validated);
    assert_eq!(c1.validated_rating, Some(RatingValue::Satisfied));
    assert_eq!(c1.reason, "praise is genuine");
    let c3 = fresh.get_decision("C-3").unwrap().unwrap();
    assert_eq!(c3.status, DecisionStatus::Pending);
}

#[test]
fn import_overwrites_matching_case_ids() {
    let store = reviewed_store();
    let log = audit::export_log(&store).unwrap();

    // Target store already holds C-1 as pending from its own detection.
    let target = ValidationStore::open_in_memory().unwrap();
    let mut session = ReviewSession::new(&target, InconsistencyDetector::new().unwrap());
    session
        .detect(&[row(
            "C-1",
            RatingValue::Unsatisfied,
            "Thank you, excellent and efficient service",
        )])
        .unwrap();
    drop(session);

    log.import_into(&target).unwrap();
    let c1 = target.get_decision("C-1").unwrap().unwrap();
    assert_eq!(c1.status, DecisionStatus::Validated);
    assert_eq!(target.summary().unwrap().total, 3);
}

#[test]
fn malformed_json_is_rejected() {
    assert!(AuditLog::from_json("{not json").is_err());
    assert!(AuditLog::from_json(r#"{"exported_at": 1}"#).is_err());
}
