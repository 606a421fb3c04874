//! Versioned schema migrations, tracked via `PRAGMA user_version`.

pub mod v001_decisions;

use rusqlite::Connection;

use accord_core::errors::StorageError;

use crate::connection::sqlite_err;

const MIGRATIONS: &[(i64, &str)] = &[(1, v001_decisions::MIGRATION_SQL)];

/// Apply every migration newer than the database's current version.
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    let current: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(sqlite_err)?;

    for (version, sql) in MIGRATIONS {
        if *version > current {
            conn.execute_batch(sql).map_err(sqlite_err)?;
            conn.pragma_update(None, "user_version", version)
                .map_err(sqlite_err)?;
        }
    }
    Ok(())
}
