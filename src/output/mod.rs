//! Output formatting for mindful.
//!
//! Every command renders either human-readable text or JSON.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::error::MindfulError;
use crate::features::breathing::{Catalog, SessionRecord, SessionTotals};
use crate::features::journal::JournalEntry;

pub use json::*;
pub use pretty::*;

/// Format the technique catalog based on output format.
///
/// # Errors
///
/// Returns `MindfulError::Parse` if JSON serialization fails.
pub fn format_techniques(
    catalog: &Catalog,
    default_id: &str,
    format: OutputFormat,
) -> Result<String, MindfulError> {
    match format {
        OutputFormat::Pretty => Ok(format_techniques_pretty(catalog, default_id)),
        OutputFormat::Json => format_techniques_json(catalog),
    }
}

/// Format session history based on output format.
///
/// # Errors
///
/// Returns `MindfulError::Parse` if JSON serialization fails.
pub fn format_history(
    records: &[SessionRecord],
    totals: &SessionTotals,
    format: OutputFormat,
) -> Result<String, MindfulError> {
    match format {
        OutputFormat::Pretty => Ok(format_history_pretty(records, totals)),
        OutputFormat::Json => format_history_json(records),
    }
}

/// Format journal entries based on output format.
///
/// # Errors
///
/// Returns `MindfulError::Parse` if JSON serialization fails.
pub fn format_journal(entries: &[JournalEntry], format: OutputFormat) -> Result<String, MindfulError> {
    match format {
        OutputFormat::Pretty => Ok(format_journal_pretty(entries)),
        OutputFormat::Json => format_journal_json(entries),
    }
}
