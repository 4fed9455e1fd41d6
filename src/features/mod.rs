//! Feature implementations for mindful.
//!
//! - Breathing: techniques, the session runner, recording, and reports
//! - Journal: free-form entries with an optional mood

pub mod breathing;
pub mod journal;
