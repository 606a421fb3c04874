//! The per-batch review state machine.

use tracing::{debug, info};

use accord_analysis::InconsistencyDetector;
use accord_core::errors::{EngineError, ReviewError};
use accord_core::types::{
    InconsistencyRecord, RatingValue, SurveyRow, ValidationDecision, ValidationSummary,
};
use accord_storage::ValidationStore;

use crate::mutate;

/// Where a batch stands in the detect → review → apply lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Detection has not run yet.
    Detecting,
    /// Detection found inconsistencies that still await a decision.
    AwaitingReview,
    /// Every detected inconsistency has a terminal decision.
    Resolved,
}

/// Explicit per-batch session over the authoritative store.
///
/// Holds no decision state of its own; every read and write goes through
/// the store, so two surfaces reviewing the same batch stay consistent.
pub struct ReviewSession<'store> {
    store: &'store ValidationStore,
    detector: InconsistencyDetector,
    state: BatchState,
}

impl<'store> ReviewSession<'store> {
    pub fn new(store: &'store ValidationStore, detector: InconsistencyDetector) -> Self {
        Self {
            store,
            detector,
            state: BatchState::Detecting,
        }
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Scan the batch, seed pending decisions, and move to
    /// `AwaitingReview` (or straight to `Resolved` when nothing needs a
    /// human). Returns the detected records.
    pub fn detect(
        &mut self,
        rows: &[SurveyRow],
    ) -> Result<Vec<InconsistencyRecord>, EngineError> {
        let records = self.detector.scan(rows);
        self.store.load_detected(&records)?;
        self.refresh_state()?;
        info!(
            detected = records.len(),
            state = ?self.state,
            "detection pass complete"
        );
        Ok(records)
    }

    /// Record a validate decision for one case.
    pub fn validate(
        &mut self,
        case_id: &str,
        validated_rating: RatingValue,
        reason: &str,
        validator: &str,
    ) -> Result<(), EngineError> {
        if !self.store.validate(case_id, validated_rating, reason, validator)? {
            return Err(ReviewError::DecisionNotFound {
                case_id: case_id.to_string(),
            }
            .into());
        }
        self.refresh_state()?;
        debug!(case_id, state = ?self.state, "case validated");
        Ok(())
    }

    /// Record an ignore decision for one case (original rating kept).
    pub fn ignore(
        &mut self,
        case_id: &str,
        reason: &str,
        validator: &str,
    ) -> Result<(), EngineError> {
        if !self.store.ignore(case_id, reason, validator)? {
            return Err(ReviewError::DecisionNotFound {
                case_id: case_id.to_string(),
            }
            .into());
        }
        self.refresh_state()?;
        debug!(case_id, state = ?self.state, "case ignored");
        Ok(())
    }

    /// Decisions still awaiting review.
    pub fn pending(&self) -> Result<Vec<ValidationDecision>, EngineError> {
        Ok(self.store.list_pending()?)
    }

    /// All decisions regardless of status.
    pub fn all_decisions(&self) -> Result<Vec<ValidationDecision>, EngineError> {
        Ok(self.store.list_all()?)
    }

    pub fn summary(&self) -> Result<ValidationSummary, EngineError> {
        Ok(self.store.summary()?)
    }

    /// Fail-closed gate: errors with the blocking case ids while any
    /// decision is pending. Callers must not generate reports past this
    /// error.
    pub fn ensure_resolved(&self) -> Result<(), ReviewError> {
        let pending = match self.store.list_pending() {
            Ok(rows) => rows,
            Err(_) => {
                // Can't prove the batch is resolved; stay closed.
                return Err(ReviewError::UnresolvedInconsistencies {
                    case_ids: Vec::new(),
                });
            }
        };
        if pending.is_empty() {
            return Ok(());
        }
        Err(ReviewError::UnresolvedInconsistencies {
            case_ids: pending.into_iter().map(|d| d.case_id).collect(),
        })
    }

    /// Apply resolved decisions onto the dataset. Refuses while any
    /// decision is pending. Returns the number of rows stamped.
    pub fn apply(&self, rows: &mut [SurveyRow]) -> Result<u32, EngineError> {
        self.ensure_resolved()?;
        Ok(mutate::apply_validations(rows, self.store)?)
    }

    /// Export the full audit log, pending rows included.
    pub fn export_log(&self) -> Result<crate::AuditLog, EngineError> {
        Ok(crate::audit::export_log(self.store)?)
    }

    fn refresh_state(&mut self) -> Result<(), EngineError> {
        let summary = self.store.summary()?;
        self.state = if summary.pending > 0 {
            BatchState::AwaitingReview
        } else {
            BatchState::Resolved
        };
        Ok(())
    }
}
