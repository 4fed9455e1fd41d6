//! Storage layer for mindful.
//!
//! This module provides SQLite-based persistence for:
//! - Breathing sessions (completed and partial runs)
//! - Journal entries

mod database;
mod migrations;

pub use database::Database;
