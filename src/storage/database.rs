//! `SQLite` database connection.
//!
//! The database lives at `~/.mindful/mindful.db` (or under `MINDFUL_HOME`)
//! and holds breathing session history and journal entries.

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, Transaction};
use tracing::debug;

use crate::config::Paths;
use crate::error::MindfulError;

use super::migrations;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database described by `paths`, creating directories first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_with(paths: &Paths) -> Result<Self, MindfulError> {
        paths.ensure_dirs()?;
        Self::open_at(&paths.database)
    }

    /// Open the database at a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_at(path: &Path) -> Result<Self, MindfulError> {
        debug!(path = %path.display(), "opening database");
        let conn = Connection::open(path).map_err(|e| {
            MindfulError::Database(format!("Failed to open database {}: {e}", path.display()))
        })?;
        conn.busy_timeout(Duration::from_secs(2))
            .map_err(|e| MindfulError::Database(format!("Failed to set busy timeout: {e}")))?;
        Self::init(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_in_memory() -> Result<Self, MindfulError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            MindfulError::Database(format!("Failed to open in-memory database: {e}"))
        })?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, MindfulError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| MindfulError::Database(format!("Failed to enable foreign keys: {e}")))?;
        migrations::run(&conn)?;
        Ok(Self { conn })
    }

    /// Get the current schema version.
    ///
    /// # Errors
    ///
    /// Returns an error if the version cannot be read.
    pub fn schema_version(&self) -> Result<i32, MindfulError> {
        migrations::get_version(&self.conn)
    }

    /// Get a reference to the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside a transaction, committing only if it succeeds.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or a database error if the transaction
    /// cannot be started or committed.
    pub fn with_transaction<T>(
        &mut self,
        f: impl FnOnce(&Transaction<'_>) -> Result<T, MindfulError>,
    ) -> Result<T, MindfulError> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| MindfulError::Database(format!("Failed to begin transaction: {e}")))?;
        let value = f(&tx)?;
        tx.commit()
            .map_err(|e| MindfulError::Database(format!("Failed to commit transaction: {e}")))?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.schema_version().unwrap() > 0);
    }

    #[test]
    fn test_open_with_paths_creates_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join("home"));

        let db = Database::open_with(&paths).unwrap();
        assert!(db.schema_version().unwrap() > 0);
        assert!(paths.database.exists());
    }

    #[test]
    fn test_reopen_keeps_version() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let first = Database::open_at(&db_path).unwrap().schema_version().unwrap();
        let second = Database::open_at(&db_path).unwrap().schema_version().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let mut db = Database::open_in_memory().unwrap();

        let result: Result<(), MindfulError> = db.with_transaction(|tx| {
            tx.execute(
                "INSERT INTO journal_entries (user_id, title, content, created_at, updated_at)
                 VALUES ('local', 't', 'c', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
                [],
            )
            .map_err(|e| MindfulError::Database(e.to_string()))?;
            Err(MindfulError::InvalidInput("abort".to_string()))
        });
        assert!(result.is_err());

        let count: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM journal_entries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
