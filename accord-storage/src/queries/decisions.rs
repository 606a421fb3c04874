//! Decision row queries: seeding, upserts, listings, counts, retention.

use rusqlite::{params, Connection};

use accord_core::errors::StorageError;
use accord_core::types::{
    DecisionStatus, InconsistencyKind, InconsistencyRecord, RatingValue, ValidationDecision,
};

use crate::connection::sqlite_err;

const DECISION_COLUMNS: &str = "case_id, rater, original_rating, comment, kind, signals, \
     suggested_rating, validated_rating, status, reason, validator, decided_at, \
     created_at, updated_at";

/// Seed a pending row for a detected inconsistency. Existing rows are
/// left untouched, so re-running detection never erases a decision.
/// Returns true if a new row was inserted.
pub fn seed_detected(
    conn: &Connection,
    record: &InconsistencyRecord,
    now: i64,
) -> Result<bool, StorageError> {
    let signals = serde_json::to_string(&record.signals).map_err(|e| {
        StorageError::CorruptRow {
            case_id: record.case_id.clone(),
            message: format!("signal list encoding: {e}"),
        }
    })?;
    let inserted = conn
        .execute(
            "INSERT INTO validation_decisions
               (case_id, rater, original_rating, comment, kind, signals,
                suggested_rating, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'pending', ?8, ?8)
             ON CONFLICT(case_id) DO NOTHING",
            params![
                record.case_id,
                record.rater,
                record.rating.as_str(),
                record.comment,
                record.kind.as_str(),
                signals,
                record.suggested_rating.as_str(),
                now,
            ],
        )
        .map_err(sqlite_err)?;
    Ok(inserted > 0)
}

/// Overwrite the decision columns of an existing row. Returns false when
/// no row exists for the case id (caller must seed first).
pub fn upsert_decision(
    conn: &Connection,
    case_id: &str,
    validated_rating: RatingValue,
    status: DecisionStatus,
    reason: &str,
    validator: &str,
    now: i64,
) -> Result<bool, StorageError> {
    let updated = conn
        .execute(
            "UPDATE validation_decisions
             SET validated_rating = ?2, status = ?3, reason = ?4, validator = ?5,
                 decided_at = ?6, updated_at = ?6
             WHERE case_id = ?1",
            params![
                case_id,
                validated_rating.as_str(),
                status.as_str(),
                reason,
                validator,
                now,
            ],
        )
        .map_err(sqlite_err)?;
    Ok(updated > 0)
}

/// Full-row upsert used when re-importing an audit log into a store.
pub fn import_decision(
    conn: &Connection,
    decision: &ValidationDecision,
) -> Result<(), StorageError> {
    let signals = serde_json::to_string(&decision.signals).map_err(|e| {
        StorageError::CorruptRow {
            case_id: decision.case_id.clone(),
            message: format!("signal list encoding: {e}"),
        }
    })?;
    conn.execute(
        "INSERT INTO validation_decisions
           (case_id, rater, original_rating, comment, kind, signals,
            suggested_rating, validated_rating, status, reason, validator,
            decided_at, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
         ON CONFLICT(case_id) DO UPDATE SET
           rater = excluded.rater,
           original_rating = excluded.original_rating,
           comment = excluded.comment,
           kind = excluded.kind,
           signals = excluded.signals,
           suggested_rating = excluded.suggested_rating,
           validated_rating = excluded.validated_rating,
           status = excluded.status,
           reason = excluded.reason,
           validator = excluded.validator,
           decided_at = excluded.decided_at,
           updated_at = excluded.updated_at",
        params![
            decision.case_id,
            decision.rater,
            decision.original_rating.as_str(),
            decision.comment,
            decision.kind.as_str(),
            signals,
            decision.suggested_rating.as_str(),
            decision.validated_rating.map(|r| r.as_str()),
            decision.status.as_str(),
            decision.reason,
            decision.validator,
            decision.decided_at,
            decision.created_at,
            decision.updated_at,
        ],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

/// Query one decision by case id.
pub fn query_by_case(
    conn: &Connection,
    case_id: &str,
) -> Result<Option<ValidationDecision>, StorageError> {
    let sql = format!(
        "SELECT {DECISION_COLUMNS} FROM validation_decisions WHERE case_id = ?1"
    );
    let mut stmt = conn.prepare_cached(&sql).map_err(sqlite_err)?;
    let mut rows = stmt
        .query_map(params![case_id], map_raw_row)
        .map_err(sqlite_err)?;
    match rows.next() {
        Some(raw) => Ok(Some(decode_row(raw.map_err(sqlite_err)?)?)),
        None => Ok(None),
    }
}

/// Query all decisions, pending included, ordered by case id.
pub fn query_all(conn: &Connection) -> Result<Vec<ValidationDecision>, StorageError> {
    query_filtered(conn, None)
}

/// Query decisions by status.
pub fn query_by_status(
    conn: &Connection,
    status: DecisionStatus,
) -> Result<Vec<ValidationDecision>, StorageError> {
    query_filtered(conn, Some(status))
}

fn query_filtered(
    conn: &Connection,
    status: Option<DecisionStatus>,
) -> Result<Vec<ValidationDecision>, StorageError> {
    let sql = match status {
        Some(_) => format!(
            "SELECT {DECISION_COLUMNS} FROM validation_decisions
             WHERE status = ?1 ORDER BY case_id ASC"
        ),
        None => format!(
            "SELECT {DECISION_COLUMNS} FROM validation_decisions ORDER BY case_id ASC"
        ),
    };
    let mut stmt = conn.prepare_cached(&sql).map_err(sqlite_err)?;
    let raw_rows = match status {
        Some(s) => stmt
            .query_map(params![s.as_str()], map_raw_row)
            .map_err(sqlite_err)?
            .collect::<Result<Vec<_>, _>>(),
        None => stmt
            .query_map([], map_raw_row)
            .map_err(sqlite_err)?
            .collect::<Result<Vec<_>, _>>(),
    }
    .map_err(sqlite_err)?;

    raw_rows.into_iter().map(decode_row).collect()
}

/// Per-status counts: (validated, ignored, pending).
pub fn status_counts(conn: &Connection) -> Result<(u32, u32, u32), StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT status, COUNT(*) FROM validation_decisions GROUP BY status",
        )
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?))
        })
        .map_err(sqlite_err)?;

    let (mut validated, mut ignored, mut pending) = (0, 0, 0);
    for row in rows {
        let (status, count) = row.map_err(sqlite_err)?;
        match DecisionStatus::parse_str(&status) {
            Some(DecisionStatus::Validated) => validated = count,
            Some(DecisionStatus::Ignored) => ignored = count,
            Some(DecisionStatus::Pending) => pending = count,
            None => {
                return Err(StorageError::CorruptRow {
                    case_id: "<aggregate>".to_string(),
                    message: format!("unknown status {status:?}"),
                })
            }
        }
    }
    Ok((validated, ignored, pending))
}

/// Delete decisions created before the cutoff. Returns the number purged.
pub fn purge_created_before(conn: &Connection, cutoff: i64) -> Result<usize, StorageError> {
    conn.execute(
        "DELETE FROM validation_decisions WHERE created_at < ?1",
        params![cutoff],
    )
    .map_err(sqlite_err)
}

struct RawDecisionRow {
    case_id: String,
    rater: String,
    original_rating: String,
    comment: String,
    kind: String,
    signals: String,
    suggested_rating: String,
    validated_rating: Option<String>,
    status: String,
    reason: String,
    validator: String,
    decided_at: Option<i64>,
    created_at: i64,
    updated_at: i64,
}

fn map_raw_row(row: &rusqlite::Row) -> rusqlite::Result<RawDecisionRow> {
    Ok(RawDecisionRow {
        case_id: row.get(0)?,
        rater: row.get(1)?,
        original_rating: row.get(2)?,
        comment: row.get(3)?,
        kind: row.get(4)?,
        signals: row.get(5)?,
        suggested_rating: row.get(6)?,
        validated_rating: row.get(7)?,
        status: row.get(8)?,
        reason: row.get(9)?,
        validator: row.get(10)?,
        decided_at: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

fn decode_row(raw: RawDecisionRow) -> Result<ValidationDecision, StorageError> {
    let corrupt = |message: String| StorageError::CorruptRow {
        case_id: raw.case_id.clone(),
        message,
    };

    let original_rating = RatingValue::parse_str(&raw.original_rating)
        .ok_or_else(|| corrupt(format!("bad original rating {:?}", raw.original_rating)))?;
    let suggested_rating = RatingValue::parse_str(&raw.suggested_rating)
        .ok_or_else(|| corrupt(format!("bad suggested rating {:?}", raw.suggested_rating)))?;
    let validated_rating = match &raw.validated_rating {
        Some(label) => Some(
            RatingValue::parse_str(label)
                .ok_or_else(|| corrupt(format!("bad validated rating {label:?}")))?,
        ),
        None => None,
    };
    let kind = InconsistencyKind::parse_str(&raw.kind)
        .ok_or_else(|| corrupt(format!("bad kind {:?}", raw.kind)))?;
    let status = DecisionStatus::parse_str(&raw.status)
        .ok_or_else(|| corrupt(format!("bad status {:?}", raw.status)))?;
    let signals: Vec<String> = serde_json::from_str(&raw.signals)
        .map_err(|e| corrupt(format!("signal list decoding: {e}")))?;

    Ok(ValidationDecision {
        case_id: raw.case_id,
        rater: raw.rater,
        original_rating,
        comment: raw.comment,
        kind,
        signals,
        suggested_rating,
        validated_rating,
        status,
        reason: raw.reason,
        validator: raw.validator,
        decided_at: raw.decided_at,
        created_at: raw.created_at,
        updated_at: raw.updated_at,
    })
}
