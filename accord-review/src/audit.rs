//! Audit log export and re-import.
//!
//! The log carries every decision row, pending included, plus the
//! summary at export time. Importing a log into an empty store and
//! exporting again yields the same decisions and the same summary.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::info;

use accord_core::errors::ReviewError;
use accord_core::types::{ValidationDecision, ValidationSummary};
use accord_storage::ValidationStore;

/// A point-in-time export of the decision store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    /// Unix seconds at export time.
    pub exported_at: i64,
    pub summary: ValidationSummary,
    pub decisions: Vec<ValidationDecision>,
}

/// Export the full decision set from a store.
pub fn export_log(store: &ValidationStore) -> Result<AuditLog, ReviewError> {
    let decisions = store
        .list_all()
        .map_err(|e| ReviewError::AuditSerialization(e.to_string()))?;
    let summary = store
        .summary()
        .map_err(|e| ReviewError::AuditSerialization(e.to_string()))?;
    info!(decisions = decisions.len(), "audit log exported");
    Ok(AuditLog {
        exported_at: unix_now(),
        summary,
        decisions,
    })
}

impl AuditLog {
    pub fn to_json(&self) -> Result<String, ReviewError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ReviewError::AuditSerialization(e.to_string()))
    }

    pub fn from_json(raw: &str) -> Result<Self, ReviewError> {
        serde_json::from_str(raw).map_err(|e| ReviewError::AuditSerialization(e.to_string()))
    }

    /// Load every decision from this log into a store, statuses and
    /// timestamps intact.
    pub fn import_into(&self, store: &ValidationStore) -> Result<(), ReviewError> {
        store
            .import_decisions(&self.decisions)
            .map_err(|e| ReviewError::AuditSerialization(e.to_string()))?;
        info!(decisions = self.decisions.len(), "audit log imported");
        Ok(())
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
