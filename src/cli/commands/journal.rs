//! Journal command implementations.

use serde_json::json;

use super::Context;
use crate::cli::args::{JournalCommands, OutputFormat};
use crate::error::MindfulError;
use crate::features::journal::{JournalEntry, JournalStorage, Mood};
use crate::output::{format_entry_pretty, format_journal, to_json};

/// Execute a journal subcommand.
///
/// # Errors
///
/// Returns an error if input is rejected, the entry does not exist, or
/// storage fails.
pub fn journal(ctx: &Context, cmd: JournalCommands) -> Result<String, MindfulError> {
    let storage = ctx.journal_storage()?;
    let user_id = ctx.user_id();

    match cmd {
        JournalCommands::Add {
            title,
            content,
            mood,
        } => {
            let mood = mood.as_deref().map(Mood::parse).transpose()?;
            let mut entry = JournalEntry::new(user_id, &title, &content, mood)?;
            storage.save(&mut entry)?;
            render_entry(&entry, ctx.format, "Added")
        }
        JournalCommands::List { limit } => {
            let entries = storage.recent(user_id, limit)?;
            format_journal(&entries, ctx.format)
        }
        JournalCommands::Show { id } => {
            let entry = require(&storage, user_id, id)?;
            match ctx.format {
                OutputFormat::Json => to_json(&entry),
                OutputFormat::Pretty => Ok(format_entry_pretty(&entry)),
            }
        }
        JournalCommands::Edit {
            id,
            title,
            content,
            mood,
        } => {
            if title.is_none() && content.is_none() && mood.is_none() {
                return Err(MindfulError::InvalidInput(
                    "Nothing to change; pass --title, --content, or --mood".to_string(),
                ));
            }
            let mood = mood.as_deref().map(Mood::parse).transpose()?;
            let mut entry = require(&storage, user_id, id)?;
            entry.apply(title.as_deref(), content.as_deref(), mood)?;
            storage.save(&mut entry)?;
            render_entry(&entry, ctx.format, "Updated")
        }
        JournalCommands::Delete { id } => {
            if !storage.delete(user_id, id)? {
                return Err(MindfulError::NotFound(format!("Journal entry {id}")));
            }
            match ctx.format {
                OutputFormat::Json => to_json(&json!({ "deleted": id })),
                OutputFormat::Pretty => Ok(format!("Deleted entry {id}")),
            }
        }
    }
}

fn require(storage: &JournalStorage, user_id: &str, id: i64) -> Result<JournalEntry, MindfulError> {
    storage
        .get(user_id, id)?
        .ok_or_else(|| MindfulError::NotFound(format!("Journal entry {id}")))
}

fn render_entry(entry: &JournalEntry, format: OutputFormat, verb: &str) -> Result<String, MindfulError> {
    match format {
        OutputFormat::Json => to_json(entry),
        OutputFormat::Pretty => Ok(format!(
            "{verb} entry {}: {}",
            entry.id.unwrap_or_default(),
            entry.title
        )),
    }
}
