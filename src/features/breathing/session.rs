//! Breathing session records.
//!
//! `Session` is what the runner emits when a run ends. `SessionRecord` is
//! the persisted form, owned by a user and stamped when it is stored.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// The outcome of one run, completed or stopped early.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Technique used for the run
    pub technique_id: String,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run ended
    pub ended_at: DateTime<Utc>,
    /// Whole seconds between start and end
    pub duration_seconds: i64,
    /// Full cycles finished before the run ended
    pub cycles_completed: u32,
    /// Whether the target cycle count was reached
    pub completed: bool,
}

impl Session {
    /// Build a session from its endpoints.
    ///
    /// The duration is floored to whole seconds and never negative.
    #[must_use]
    pub fn new(
        technique_id: &str,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        cycles_completed: u32,
        completed: bool,
    ) -> Self {
        let duration_seconds = ended_at
            .signed_duration_since(started_at)
            .num_seconds()
            .max(0);

        Self {
            technique_id: technique_id.to_string(),
            started_at,
            ended_at,
            duration_seconds,
            cycles_completed,
            completed,
        }
    }
}

/// A stored breathing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Database ID (None if not persisted)
    pub id: Option<i64>,
    /// Owner of the record
    pub user_id: String,
    /// Technique id
    #[serde(rename = "type")]
    pub technique: String,
    /// Seconds spent breathing
    #[serde(rename = "duration")]
    pub duration_seconds: i64,
    /// Full cycles finished
    pub cycles_completed: u32,
    /// Whether the run reached its target
    pub completed: bool,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Build an unsaved record for `user_id` from an emitted session.
    #[must_use]
    pub fn from_session(session: &Session, user_id: &str) -> Self {
        Self {
            id: None,
            user_id: user_id.to_string(),
            technique: session.technique_id.clone(),
            duration_seconds: session.duration_seconds,
            cycles_completed: session.cycles_completed,
            completed: session.completed,
            started_at: session.started_at,
            created_at: session.ended_at,
        }
    }

    /// Get creation time in local timezone.
    #[must_use]
    pub fn created_at_local(&self) -> DateTime<Local> {
        self.created_at.with_timezone(&Local)
    }
}
