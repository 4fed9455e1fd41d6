//! Schema migrations.
//!
//! The schema version is kept in `PRAGMA user_version`. Each version has
//! one migration, applied in order when the database is opened.

use rusqlite::Connection;
use tracing::info;

use crate::error::MindfulError;

/// Current schema version.
const CURRENT_VERSION: i32 = 1;

/// Get the schema version; 0 for a new database.
///
/// # Errors
///
/// Returns an error if the pragma cannot be read.
pub fn get_version(conn: &Connection) -> Result<i32, MindfulError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| MindfulError::Database(format!("Failed to get schema version: {e}")))
}

fn set_version(conn: &Connection, version: i32) -> Result<(), MindfulError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| MindfulError::Database(format!("Failed to set schema version: {e}")))
}

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if any migration fails.
pub fn run(conn: &Connection) -> Result<(), MindfulError> {
    let current = get_version(conn)?;

    for version in (current + 1)..=CURRENT_VERSION {
        info!(version, "applying schema migration");
        match version {
            1 => migrate_v1(conn)?,
            _ => {
                return Err(MindfulError::Database(format!(
                    "Unknown migration version: {version}"
                )))
            }
        }
        set_version(conn, version)?;
    }

    Ok(())
}

/// v1: breathing sessions and journal entries.
fn migrate_v1(conn: &Connection) -> Result<(), MindfulError> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS breathing_sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            technique TEXT NOT NULL,
            duration_seconds INTEGER NOT NULL CHECK (duration_seconds >= 0),
            cycles_completed INTEGER NOT NULL DEFAULT 0,
            completed INTEGER NOT NULL DEFAULT 0,
            started_at TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_breathing_sessions_created
        ON breathing_sessions(created_at);

        CREATE INDEX IF NOT EXISTS idx_breathing_sessions_user
        ON breathing_sessions(user_id);

        CREATE TABLE IF NOT EXISTS journal_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            mood TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_journal_entries_created
        ON journal_entries(created_at);
        ",
    )
    .map_err(|e| MindfulError::Database(format!("Migration v1 failed: {e}")))
}
