//! Breathing session storage.
//!
//! Persists emitted sessions to the local database.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use super::recorder::SessionStore;
use super::session::SessionRecord;
use crate::error::MindfulError;
use crate::storage::Database;

const SELECT_COLUMNS: &str = "SELECT id, user_id, technique, duration_seconds, cycles_completed,
                                     completed, started_at, created_at
                              FROM breathing_sessions";

/// Aggregate counters over a user's sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionTotals {
    /// All sessions, completed or not
    pub sessions: i64,
    /// Sessions that reached their target
    pub completed: i64,
    /// Seconds across all sessions
    pub seconds: i64,
    /// Cycles across all sessions
    pub cycles: i64,
}

/// Storage for breathing sessions.
pub struct BreathingStorage {
    db: Database,
}

impl BreathingStorage {
    /// Create storage with an existing database connection.
    #[must_use]
    pub const fn with_database(db: Database) -> Self {
        Self { db }
    }

    /// Insert a record and return its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert(&self, record: &SessionRecord) -> Result<i64, MindfulError> {
        let conn = self.db.connection();

        conn.execute(
            r"INSERT INTO breathing_sessions
              (user_id, technique, duration_seconds, cycles_completed, completed, started_at, created_at)
              VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.user_id,
                record.technique,
                record.duration_seconds,
                record.cycles_completed,
                record.completed,
                record.started_at.to_rfc3339(),
                record.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| MindfulError::Database(format!("Failed to insert session: {e}")))?;

        Ok(conn.last_insert_rowid())
    }

    /// Get one of a user's sessions by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get(&self, user_id: &str, id: i64) -> Result<Option<SessionRecord>, MindfulError> {
        self.db
            .connection()
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1 AND user_id = ?2"),
                params![id, user_id],
                row_to_record,
            )
            .optional()
            .map_err(|e| MindfulError::Database(format!("Failed to query session: {e}")))
    }

    /// Most recent sessions for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn recent(&self, user_id: &str, limit: usize) -> Result<Vec<SessionRecord>, MindfulError> {
        self.query(
            &format!("{SELECT_COLUMNS} WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2"),
            params![user_id, limit],
        )
    }

    /// Sessions for a user created in `[start, end)`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SessionRecord>, MindfulError> {
        self.query(
            &format!(
                "{SELECT_COLUMNS} WHERE user_id = ?1 AND created_at >= ?2 AND created_at < ?3
                 ORDER BY created_at DESC, id DESC"
            ),
            params![user_id, start.to_rfc3339(), end.to_rfc3339()],
        )
    }

    /// Most recent sessions of one technique for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn by_technique(
        &self,
        user_id: &str,
        technique: &str,
        limit: usize,
    ) -> Result<Vec<SessionRecord>, MindfulError> {
        self.query(
            &format!(
                "{SELECT_COLUMNS} WHERE user_id = ?1 AND technique = ?2
                 ORDER BY created_at DESC, id DESC LIMIT ?3"
            ),
            params![user_id, technique, limit],
        )
    }

    /// Creation times of every completed session for a user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn completed_times(&self, user_id: &str) -> Result<Vec<DateTime<Utc>>, MindfulError> {
        let mut stmt = self
            .db
            .connection()
            .prepare(
                "SELECT created_at FROM breathing_sessions
                 WHERE user_id = ?1 AND completed = 1 ORDER BY created_at",
            )
            .map_err(|e| MindfulError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([user_id], |row| {
                let created_at: String = row.get(0)?;
                parse_timestamp(0, &created_at)
            })
            .map_err(|e| MindfulError::Database(format!("Failed to query sessions: {e}")))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| MindfulError::Database(e.to_string()))
    }

    /// Totals across all of a user's sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn totals(&self, user_id: &str) -> Result<SessionTotals, MindfulError> {
        self.db
            .connection()
            .query_row(
                r"SELECT COUNT(*),
                         COALESCE(SUM(completed), 0),
                         COALESCE(SUM(duration_seconds), 0),
                         COALESCE(SUM(cycles_completed), 0)
                  FROM breathing_sessions WHERE user_id = ?1",
                [user_id],
                |row| {
                    Ok(SessionTotals {
                        sessions: row.get(0)?,
                        completed: row.get(1)?,
                        seconds: row.get(2)?,
                        cycles: row.get(3)?,
                    })
                },
            )
            .map_err(|e| MindfulError::Database(format!("Failed to query totals: {e}")))
    }

    /// Delete one of a user's sessions. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete(&self, user_id: &str, id: i64) -> Result<bool, MindfulError> {
        let rows = self
            .db
            .connection()
            .execute(
                "DELETE FROM breathing_sessions WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )
            .map_err(|e| MindfulError::Database(format!("Failed to delete session: {e}")))?;
        Ok(rows > 0)
    }

    /// Delete all of a user's sessions, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn clear(&mut self, user_id: &str) -> Result<usize, MindfulError> {
        self.db.with_transaction(|tx| {
            tx.execute("DELETE FROM breathing_sessions WHERE user_id = ?1", [user_id])
                .map_err(|e| MindfulError::Database(format!("Failed to clear sessions: {e}")))
        })
    }

    fn query(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<SessionRecord>, MindfulError> {
        let mut stmt = self
            .db
            .connection()
            .prepare(sql)
            .map_err(|e| MindfulError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(params, row_to_record)
            .map_err(|e| MindfulError::Database(format!("Failed to query sessions: {e}")))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| MindfulError::Database(e.to_string()))
    }
}

impl SessionStore for BreathingStorage {
    fn save(&self, record: &SessionRecord) -> Result<i64, MindfulError> {
        self.insert(record)
    }
}

fn row_to_record(row: &Row<'_>) -> Result<SessionRecord, rusqlite::Error> {
    let started_at: String = row.get(6)?;
    let created_at: String = row.get(7)?;

    Ok(SessionRecord {
        id: Some(row.get(0)?),
        user_id: row.get(1)?,
        technique: row.get(2)?,
        duration_seconds: row.get(3)?,
        cycles_completed: row.get(4)?,
        completed: row.get(5)?,
        started_at: parse_timestamp(6, &started_at)?,
        created_at: parse_timestamp(7, &created_at)?,
    })
}

/// Parse a stored RFC 3339 timestamp column.
pub(crate) fn parse_timestamp(column: usize, value: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}
