//! JSON output formatting.

use serde::Serialize;
use serde_json::json;

use crate::error::MindfulError;
use crate::features::breathing::{Catalog, SessionRecord};
use crate::features::journal::JournalEntry;

/// Format the technique catalog as JSON.
///
/// # Errors
///
/// Returns `MindfulError::Parse` if JSON serialization fails.
pub fn format_techniques_json(catalog: &Catalog) -> Result<String, MindfulError> {
    let items: Vec<_> = catalog.iter().collect();
    let output = json!({
        "count": items.len(),
        "items": items,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format session history as JSON.
///
/// # Errors
///
/// Returns `MindfulError::Parse` if JSON serialization fails.
pub fn format_history_json(records: &[SessionRecord]) -> Result<String, MindfulError> {
    let output = json!({
        "count": records.len(),
        "items": records,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format journal entries as JSON.
///
/// # Errors
///
/// Returns `MindfulError::Parse` if JSON serialization fails.
pub fn format_journal_json(entries: &[JournalEntry]) -> Result<String, MindfulError> {
    let output = json!({
        "count": entries.len(),
        "items": entries,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type.
///
/// # Errors
///
/// Returns `MindfulError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, MindfulError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_techniques_json_lists_catalog() {
        let catalog = Catalog::builtin();
        let value: serde_json::Value =
            serde_json::from_str(&format_techniques_json(&catalog).unwrap()).unwrap();

        assert_eq!(value["count"], catalog.len());
        assert_eq!(value["items"][0]["id"], "478");
        assert_eq!(value["items"][0]["phases"][1]["name"], "hold");
    }

    #[test]
    fn test_empty_history_json() {
        let value: serde_json::Value =
            serde_json::from_str(&format_history_json(&[]).unwrap()).unwrap();
        assert_eq!(value["count"], 0);
        assert!(value["items"].as_array().unwrap().is_empty());
    }
}
