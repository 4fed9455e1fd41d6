//! Error types for mindful.

use thiserror::Error;

/// Errors surfaced by the breathing engine, storage, and CLI layers.
#[derive(Error, Debug)]
pub enum MindfulError {
    /// A technique id that is not in the catalog.
    #[error("Unknown breathing technique: {0}")]
    InvalidTechnique(String),

    /// Configuration could not be read, parsed, or written.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A `SQLite` operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// A requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User input was rejected before reaching storage.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Terminal setup, drawing, or event handling failed.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MindfulError {
    /// Exit code for the CLI.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidTechnique(_) | Self::InvalidInput(_) => 2,
            Self::NotFound(_) => 3,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_technique_message() {
        let err = MindfulError::InvalidTechnique("nope".to_string());
        assert_eq!(err.to_string(), "Unknown breathing technique: nope");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_json_error_converts() {
        let err: MindfulError = serde_json::from_str::<i32>("not json").unwrap_err().into();
        assert!(matches!(err, MindfulError::Parse(_)));
        assert_eq!(err.exit_code(), 1);
    }
}
