//! Journaling.
//!
//! Free-form entries with an optional mood, stored per user.

pub mod entry;
pub mod storage;

pub use entry::{JournalEntry, Mood};
pub use storage::JournalStorage;
