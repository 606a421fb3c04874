//! V001: validation decisions.
//! One row per case id, seeded as pending by detection, moved to a
//! terminal state by a reviewer, never hard-deleted except by retention.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS validation_decisions (
    case_id TEXT PRIMARY KEY,
    rater TEXT NOT NULL DEFAULT '',
    original_rating TEXT NOT NULL,
    comment TEXT NOT NULL DEFAULT '',
    kind TEXT NOT NULL,
    signals TEXT NOT NULL DEFAULT '[]',
    suggested_rating TEXT NOT NULL,
    validated_rating TEXT,
    status TEXT NOT NULL DEFAULT 'pending',
    reason TEXT NOT NULL DEFAULT '',
    validator TEXT NOT NULL DEFAULT '',
    decided_at INTEGER,
    created_at INTEGER NOT NULL DEFAULT (unixepoch()),
    updated_at INTEGER NOT NULL DEFAULT (unixepoch())
) STRICT;

CREATE INDEX IF NOT EXISTS idx_validation_decisions_status
    ON validation_decisions(status);
CREATE INDEX IF NOT EXISTS idx_validation_decisions_updated
    ON validation_decisions(updated_at);
"#;
