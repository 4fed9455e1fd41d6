//! Hand-off from the runner to persistence.

use tracing::{info, warn};

use super::session::{Session, SessionRecord};
use crate::error::MindfulError;

/// Durable storage for emitted sessions.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore {
    /// Store a record, returning its new id.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be written.
    fn save(&self, record: &SessionRecord) -> Result<i64, MindfulError>;
}

/// Saves emitted sessions on behalf of one user.
///
/// Saving is fire-and-forget: failures are logged and never reach the
/// runner.
pub struct SessionRecorder<S: SessionStore> {
    store: S,
    user_id: String,
}

impl<S: SessionStore> SessionRecorder<S> {
    /// Create a recorder writing to `store` as `user_id`.
    pub fn new(store: S, user_id: impl Into<String>) -> Self {
        Self {
            store,
            user_id: user_id.into(),
        }
    }

    /// Persist a session, returning the stored record when the save succeeded.
    pub fn record(&self, session: &Session) -> Option<SessionRecord> {
        let mut record = SessionRecord::from_session(session, &self.user_id);

        match self.store.save(&record) {
            Ok(id) => {
                record.id = Some(id);
                info!(id, technique = %record.technique, completed = record.completed, "session saved");
                Some(record)
            }
            Err(e) => {
                warn!(technique = %record.technique, error = %e, "failed to save session");
                None
            }
        }
    }
}
