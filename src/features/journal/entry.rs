//! Journal entry types.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MindfulError;

/// How the writer felt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Great,
    Good,
    Okay,
    Low,
    Bad,
}

impl Mood {
    /// Parse a mood name.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::InvalidInput` for unknown names.
    pub fn parse(s: &str) -> Result<Self, MindfulError> {
        match s.trim().to_lowercase().as_str() {
            "great" | "5" => Ok(Self::Great),
            "good" | "4" => Ok(Self::Good),
            "okay" | "ok" | "3" => Ok(Self::Okay),
            "low" | "2" => Ok(Self::Low),
            "bad" | "1" => Ok(Self::Bad),
            other => Err(MindfulError::InvalidInput(format!(
                "Unknown mood '{other}' (expected great, good, okay, low, or bad)"
            ))),
        }
    }

    /// Stored name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Great => "great",
            Self::Good => "good",
            Self::Okay => "okay",
            Self::Low => "low",
            Self::Bad => "bad",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Database ID (None if not persisted)
    pub id: Option<i64>,
    /// Owner
    pub user_id: String,
    /// Title
    pub title: String,
    /// Body text
    pub content: String,
    /// Optional mood
    pub mood: Option<Mood>,
    /// When the entry was written
    pub created_at: DateTime<Utc>,
    /// When the entry was last edited
    pub updated_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Create an unsaved entry, trimming title and content.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::InvalidInput` if the title or content is blank.
    pub fn new(
        user_id: &str,
        title: &str,
        content: &str,
        mood: Option<Mood>,
    ) -> Result<Self, MindfulError> {
        let now = Utc::now();
        Ok(Self {
            id: None,
            user_id: user_id.to_string(),
            title: non_blank("title", title)?,
            content: non_blank("content", content)?,
            mood,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply an edit. Fields left as `None` are kept.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::InvalidInput` if a new title or content is blank.
    pub fn apply(
        &mut self,
        title: Option<&str>,
        content: Option<&str>,
        mood: Option<Mood>,
    ) -> Result<(), MindfulError> {
        if let Some(title) = title {
            self.title = non_blank("title", title)?;
        }
        if let Some(content) = content {
            self.content = non_blank("content", content)?;
        }
        if mood.is_some() {
            self.mood = mood;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// First line of the content, cut to `width` characters.
    #[must_use]
    pub fn preview(&self, width: usize) -> String {
        let first = self.content.lines().next().unwrap_or_default();
        if first.chars().count() > width {
            let cut: String = first.chars().take(width.saturating_sub(3)).collect();
            format!("{cut}...")
        } else {
            first.to_string()
        }
    }

    /// Get creation time in local timezone.
    #[must_use]
    pub fn created_at_local(&self) -> DateTime<Local> {
        self.created_at.with_timezone(&Local)
    }
}

fn non_blank(field: &str, value: &str) -> Result<String, MindfulError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MindfulError::InvalidInput(format!("Journal {field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_parse() {
        assert_eq!(Mood::parse("Great").unwrap(), Mood::Great);
        assert_eq!(Mood::parse("ok").unwrap(), Mood::Okay);
        assert_eq!(Mood::parse("1").unwrap(), Mood::Bad);
        assert!(Mood::parse("meh").is_err());
    }

    #[test]
    fn test_new_trims_and_validates() {
        let entry = JournalEntry::new("local", "  Morning  ", " Calm start \n", Some(Mood::Good)).unwrap();
        assert_eq!(entry.title, "Morning");
        assert_eq!(entry.content, "Calm start");
        assert!(entry.id.is_none());

        assert!(JournalEntry::new("local", "   ", "body", None).is_err());
        assert!(JournalEntry::new("local", "title", "", None).is_err());
    }

    #[test]
    fn test_apply_keeps_unset_fields() {
        let mut entry = JournalEntry::new("local", "Title", "Body", Some(Mood::Low)).unwrap();
        entry.apply(None, Some("New body"), None).unwrap();

        assert_eq!(entry.title, "Title");
        assert_eq!(entry.content, "New body");
        assert_eq!(entry.mood, Some(Mood::Low));
        assert!(entry.updated_at >= entry.created_at);
        assert!(entry.apply(Some(" "), None, None).is_err());
    }

    #[test]
    fn test_preview() {
        let entry = JournalEntry::new("local", "T", "a very long first line\nsecond", None).unwrap();
        assert_eq!(entry.preview(50), "a very long first line");
        assert_eq!(entry.preview(10), "a very ...");
    }
}
