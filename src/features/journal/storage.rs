//! Journal entry storage.

use rusqlite::{params, OptionalExtension, Row};

use super::entry::{JournalEntry, Mood};
use crate::error::MindfulError;
use crate::features::breathing::storage::parse_timestamp;
use crate::storage::Database;

/// Storage for journal entries.
pub struct JournalStorage {
    db: Database,
}

impl JournalStorage {
    /// Create storage with an existing database connection.
    #[must_use]
    pub const fn with_database(db: Database) -> Self {
        Self { db }
    }

    /// Save an entry: insert when it has no id, update otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails or the entry no longer exists.
    pub fn save(&self, entry: &mut JournalEntry) -> Result<(), MindfulError> {
        let conn = self.db.connection();

        match entry.id {
            None => {
                conn.execute(
                    r"INSERT INTO journal_entries (user_id, title, content, mood, created_at, updated_at)
                      VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        entry.user_id,
                        entry.title,
                        entry.content,
                        entry.mood.map(|m| m.as_str()),
                        entry.created_at.to_rfc3339(),
                        entry.updated_at.to_rfc3339(),
                    ],
                )
                .map_err(|e| MindfulError::Database(format!("Failed to insert journal entry: {e}")))?;
                entry.id = Some(conn.last_insert_rowid());
            }
            Some(id) => {
                let rows = conn
                    .execute(
                        r"UPDATE journal_entries
                          SET title = ?1, content = ?2, mood = ?3, updated_at = ?4
                          WHERE id = ?5",
                        params![
                            entry.title,
                            entry.content,
                            entry.mood.map(|m| m.as_str()),
                            entry.updated_at.to_rfc3339(),
                            id,
                        ],
                    )
                    .map_err(|e| {
                        MindfulError::Database(format!("Failed to update journal entry: {e}"))
                    })?;
                if rows == 0 {
                    return Err(MindfulError::NotFound(format!("Journal entry {id}")));
                }
            }
        }

        Ok(())
    }

    /// Get an entry owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get(&self, user_id: &str, id: i64) -> Result<Option<JournalEntry>, MindfulError> {
        self.db
            .connection()
            .query_row(
                r"SELECT id, user_id, title, content, mood, created_at, updated_at
                  FROM journal_entries WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
                row_to_entry,
            )
            .optional()
            .map_err(|e| MindfulError::Database(format!("Failed to query journal entry: {e}")))
    }

    /// Most recent entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn recent(&self, user_id: &str, limit: usize) -> Result<Vec<JournalEntry>, MindfulError> {
        let mut stmt = self
            .db
            .connection()
            .prepare(
                r"SELECT id, user_id, title, content, mood, created_at, updated_at
                  FROM journal_entries WHERE user_id = ?1
                  ORDER BY created_at DESC, id DESC LIMIT ?2",
            )
            .map_err(|e| MindfulError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(params![user_id, limit], row_to_entry)
            .map_err(|e| MindfulError::Database(format!("Failed to query journal: {e}")))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| MindfulError::Database(e.to_string()))
    }

    /// Delete an entry owned by `user_id`. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete(&self, user_id: &str, id: i64) -> Result<bool, MindfulError> {
        let rows = self
            .db
            .connection()
            .execute(
                "DELETE FROM journal_entries WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )
            .map_err(|e| MindfulError::Database(format!("Failed to delete journal entry: {e}")))?;
        Ok(rows > 0)
    }
}

fn row_to_entry(row: &Row<'_>) -> Result<JournalEntry, rusqlite::Error> {
    let mood: Option<String> = row.get(4)?;
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;

    Ok(JournalEntry {
        id: Some(row.get(0)?),
        user_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        // Unknown stored moods read back as none rather than failing the row.
        mood: mood.and_then(|m| Mood::parse(&m).ok()),
        created_at: parse_timestamp(5, &created_at)?,
        updated_at: parse_timestamp(6, &updated_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_storage() -> JournalStorage {
        JournalStorage::with_database(Database::open_in_memory().unwrap())
    }

    #[test]
    fn test_save_and_get() {
        let storage = create_test_storage();
        let mut entry = JournalEntry::new("local", "Evening", "Box breathing helped", Some(Mood::Good)).unwrap();

        storage.save(&mut entry).unwrap();
        let id = entry.id.unwrap();

        let loaded = storage.get("local", id).unwrap().unwrap();
        assert_eq!(loaded.title, "Evening");
        assert_eq!(loaded.mood, Some(Mood::Good));
        assert!(storage.get("someone-else", id).unwrap().is_none());
    }

    #[test]
    fn test_update() {
        let storage = create_test_storage();
        let mut entry = JournalEntry::new("local", "Draft", "First", None).unwrap();
        storage.save(&mut entry).unwrap();

        entry.apply(Some("Final"), None, Some(Mood::Great)).unwrap();
        storage.save(&mut entry).unwrap();

        let loaded = storage.get("local", entry.id.unwrap()).unwrap().unwrap();
        assert_eq!(loaded.title, "Final");
        assert_eq!(loaded.content, "First");
        assert_eq!(loaded.mood, Some(Mood::Great));
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let storage = create_test_storage();
        let mut entry = JournalEntry::new("local", "Ghost", "Gone", None).unwrap();
        entry.id = Some(99);
        assert!(matches!(storage.save(&mut entry), Err(MindfulError::NotFound(_))));
    }

    #[test]
    fn test_recent_and_delete() {
        let storage = create_test_storage();
        for i in 0..4 {
            let mut entry = JournalEntry::new("local", &format!("Entry {i}"), "text", None).unwrap();
            storage.save(&mut entry).unwrap();
        }

        let recent = storage.recent("local", 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].title, "Entry 3");

        let id = recent[0].id.unwrap();
        assert!(storage.delete("local", id).unwrap());
        assert!(!storage.delete("local", id).unwrap());
        assert_eq!(storage.recent("local", 10).unwrap().len(), 3);
    }
}
