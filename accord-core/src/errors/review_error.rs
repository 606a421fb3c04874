//! Review workflow errors.

/// Errors that block the review workflow.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    /// Report generation was attempted while decisions are still pending.
    /// Carries the blocking case ids so the caller can surface them;
    /// generating a report past this error is explicitly forbidden.
    #[error("{} inconsistencies awaiting review", case_ids.len())]
    UnresolvedInconsistencies { case_ids: Vec<String> },

    /// A decision was submitted for a case id never seeded by detection.
    #[error("No pending inconsistency for case {case_id}")]
    DecisionNotFound { case_id: String },

    #[error("Audit log serialization failed: {0}")]
    AuditSerialization(String),
}
