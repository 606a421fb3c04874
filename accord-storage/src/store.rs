//! The authoritative validation store.
//!
//! Disk is the single source of truth. The in-process cache is a
//! read-through copy kept in sync on every successful write; it serves
//! reads only when the disk read path fails, and writes that fail are
//! surfaced to the caller rather than absorbed by the cache.

use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use accord_core::errors::StorageError;
use accord_core::types::{
    DecisionStatus, InconsistencyRecord, RatingValue, SurveyRow, ValidationDecision,
    ValidationSummary,
};

use crate::connection::Database;
use crate::queries::decisions;

/// Reason stamped on apply when a validated decision carries none.
const DEFAULT_VALIDATED_REASON: &str = "correction applied";
/// Reason stamped on apply when an ignored decision carries none.
const DEFAULT_IGNORED_REASON: &str = "original kept after review";

/// Durable keyed store of review decisions, with idempotent seeding and
/// idempotent application onto a dataset.
pub struct ValidationStore {
    db: Database,
    cache: Mutex<FxHashMap<String, ValidationDecision>>,
}

impl ValidationStore {
    /// Open (or create) the store at the given path.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let store = Self {
            db: Database::open(path)?,
            cache: Mutex::new(FxHashMap::default()),
        };
        store.warm_cache()?;
        Ok(store)
    }

    /// In-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self {
            db: Database::open_in_memory()?,
            cache: Mutex::new(FxHashMap::default()),
        })
    }

    fn warm_cache(&self) -> Result<(), StorageError> {
        let all = self.db.with_reader(decisions::query_all)?;
        let mut cache = self.lock_cache()?;
        for decision in all {
            cache.insert(decision.case_id.clone(), decision);
        }
        Ok(())
    }

    /// Seed pending rows for a batch of detected inconsistencies.
    ///
    /// Idempotent: case ids already present keep their row, whatever its
    /// status — re-running detection never downgrades a decision back to
    /// pending. Returns the number of newly seeded rows.
    pub fn load_detected(
        &self,
        records: &[InconsistencyRecord],
    ) -> Result<u32, StorageError> {
        let now = unix_now();
        let mut inserted = 0;
        for record in records {
            let fresh = self
                .db
                .with_writer(|conn| decisions::seed_detected(conn, record, now))?;
            if fresh {
                inserted += 1;
            } else if let Some(existing) = self.get_decision(&record.case_id)? {
                // Same case id from an overlapping batch with a different
                // underlying row; flag it rather than guessing.
                if existing.original_rating != record.rating {
                    warn!(
                        case_id = %record.case_id,
                        stored = existing.original_rating.as_str(),
                        incoming = record.rating.as_str(),
                        "case id collision across batches; keeping stored decision"
                    );
                }
            }
            self.refresh_cache_entry(&record.case_id)?;
        }
        info!(
            records = records.len(),
            seeded = inserted,
            "detected inconsistencies loaded"
        );
        Ok(inserted)
    }

    /// Record a validate decision: the corrected rating replaces the
    /// original when applied. Returns false when the case id was never
    /// seeded.
    pub fn validate(
        &self,
        case_id: &str,
        validated_rating: RatingValue,
        reason: &str,
        validator: &str,
    ) -> Result<bool, StorageError> {
        self.decide(case_id, validated_rating, DecisionStatus::Validated, reason, validator)
    }

    /// Record an ignore decision: the original rating is kept but the
    /// row is still stamped as reviewed. Returns false when the case id
    /// was never seeded.
    pub fn ignore(
        &self,
        case_id: &str,
        reason: &str,
        validator: &str,
    ) -> Result<bool, StorageError> {
        let Some(existing) = self.get_decision(case_id)? else {
            return Ok(false);
        };
        self.decide(
            case_id,
            existing.original_rating,
            DecisionStatus::Ignored,
            reason,
            validator,
        )
    }

    fn decide(
        &self,
        case_id: &str,
        validated_rating: RatingValue,
        status: DecisionStatus,
        reason: &str,
        validator: &str,
    ) -> Result<bool, StorageError> {
        debug_assert!(status.is_terminal());
        let now = unix_now();
        let updated = self.db.with_writer(|conn| {
            decisions::upsert_decision(
                conn,
                case_id,
                validated_rating,
                status,
                reason,
                validator,
                now,
            )
        })?;
        if updated {
            self.refresh_cache_entry(case_id)?;
            debug!(case_id, status = status.as_str(), "decision recorded");
        }
        Ok(updated)
    }

    /// One decision by case id, disk first, cache on read failure.
    pub fn get_decision(
        &self,
        case_id: &str,
    ) -> Result<Option<ValidationDecision>, StorageError> {
        match self.db.with_reader(|conn| decisions::query_by_case(conn, case_id)) {
            Ok(found) => Ok(found),
            Err(e) => {
                warn!(error = %e, "decision read failed; serving from cache");
                Ok(self.lock_cache()?.get(case_id).cloned())
            }
        }
    }

    /// All pending decisions.
    pub fn list_pending(&self) -> Result<Vec<ValidationDecision>, StorageError> {
        match self
            .db
            .with_reader(|conn| decisions::query_by_status(conn, DecisionStatus::Pending))
        {
            Ok(rows) => Ok(rows),
            Err(e) => {
                warn!(error = %e, "pending read failed; serving from cache");
                Ok(self.cached_with(|d| d.status == DecisionStatus::Pending)?)
            }
        }
    }

    /// All decisions regardless of status.
    pub fn list_all(&self) -> Result<Vec<ValidationDecision>, StorageError> {
        match self.db.with_reader(decisions::query_all) {
            Ok(rows) => Ok(rows),
            Err(e) => {
                warn!(error = %e, "full read failed; serving from cache");
                Ok(self.cached_with(|_| true)?)
            }
        }
    }

    /// Per-status counts and completion rate.
    pub fn summary(&self) -> Result<ValidationSummary, StorageError> {
        match self.db.with_reader(decisions::status_counts) {
            Ok((validated, ignored, pending)) => {
                Ok(ValidationSummary::from_counts(validated, ignored, pending))
            }
            Err(e) => {
                warn!(error = %e, "summary read failed; computing from cache");
                let cache = self.lock_cache()?;
                let mut counts = (0, 0, 0);
                for decision in cache.values() {
                    match decision.status {
                        DecisionStatus::Validated => counts.0 += 1,
                        DecisionStatus::Ignored => counts.1 += 1,
                        DecisionStatus::Pending => counts.2 += 1,
                    }
                }
                Ok(ValidationSummary::from_counts(counts.0, counts.1, counts.2))
            }
        }
    }

    /// Apply every terminal decision onto the dataset, stamping the
    /// traceability columns.
    ///
    /// Idempotent: the new rating is always derived from the preserved
    /// original, never from an already-mutated value, so repeated
    /// applies produce identical rows. Matching is by case id only, so
    /// the dataset may be filtered or reordered upstream. Returns the
    /// number of rows stamped.
    pub fn apply_to(&self, rows: &mut [SurveyRow]) -> Result<u32, StorageError> {
        let terminal: FxHashMap<String, ValidationDecision> = self
            .list_all()?
            .into_iter()
            .filter(|d| d.status.is_terminal())
            .map(|d| (d.case_id.clone(), d))
            .collect();

        let mut stamped = 0;
        for row in rows.iter_mut() {
            let Some(decision) = terminal.get(&row.case_id) else {
                continue;
            };
            apply_decision_to_row(row, decision);
            stamped += 1;
        }
        info!(stamped, "validations applied to dataset");
        Ok(stamped)
    }

    /// Re-import decisions from an exported audit log.
    pub fn import_decisions(
        &self,
        imported: &[ValidationDecision],
    ) -> Result<(), StorageError> {
        for decision in imported {
            self.db
                .with_writer(|conn| decisions::import_decision(conn, decision))?;
            self.refresh_cache_entry(&decision.case_id)?;
        }
        Ok(())
    }

    /// Delete decisions older than the given number of days. Returns the
    /// number purged.
    pub fn purge_older_than(&self, days: u32) -> Result<usize, StorageError> {
        let cutoff = unix_now() - i64::from(days) * 86_400;
        let purged = self
            .db
            .with_writer(|conn| decisions::purge_created_before(conn, cutoff))?;
        if purged > 0 {
            let mut cache = self.lock_cache()?;
            cache.retain(|_, d| d.created_at >= cutoff);
            info!(purged, days, "old decisions purged");
        }
        Ok(purged)
    }

    // Read-back goes through the writer connection: it always sees the
    // row just written, and keeps the cache fresh even when the read
    // pool is failing.
    fn refresh_cache_entry(&self, case_id: &str) -> Result<(), StorageError> {
        let fresh = self
            .db
            .with_writer(|conn| decisions::query_by_case(conn, case_id))?;
        let mut cache = self.lock_cache()?;
        match fresh {
            Some(decision) => {
                cache.insert(case_id.to_string(), decision);
            }
            None => {
                cache.remove(case_id);
            }
        }
        Ok(())
    }

    fn cached_with(
        &self,
        keep: impl Fn(&ValidationDecision) -> bool,
    ) -> Result<Vec<ValidationDecision>, StorageError> {
        let cache = self.lock_cache()?;
        let mut rows: Vec<ValidationDecision> =
            cache.values().filter(|d| keep(d)).cloned().collect();
        rows.sort_by(|a, b| a.case_id.cmp(&b.case_id));
        Ok(rows)
    }

    fn lock_cache(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, FxHashMap<String, ValidationDecision>>, StorageError>
    {
        self.cache.lock().map_err(|_| StorageError::SqliteError {
            message: "cache lock poisoned".to_string(),
        })
    }
}

/// Stamp one row from one terminal decision, deriving from the preserved
/// original rating.
fn apply_decision_to_row(row: &mut SurveyRow, decision: &ValidationDecision) {
    if row.original_rating.is_none() {
        row.original_rating = Some(row.rating);
    }
    let original = row.original_rating.unwrap_or(row.rating);

    row.rating = match decision.status {
        DecisionStatus::Validated => decision.validated_rating.unwrap_or(original),
        DecisionStatus::Ignored | DecisionStatus::Pending => original,
    };
    row.validation_applied = true;
    row.validation_reason = if decision.reason.is_empty() {
        match decision.status {
            DecisionStatus::Validated => DEFAULT_VALIDATED_REASON.to_string(),
            _ => DEFAULT_IGNORED_REASON.to_string(),
        }
    } else {
        decision.reason.clone()
    };
    row.validation_decided_at = decision.decided_at;
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
