//! Command implementations for mindful.
//!
//! Each command returns the text to print; `main` writes it to stdout.

mod breathe;
mod completions;
mod config;
mod journal;

pub use breathe::{breathe, clear, history, report, simulate, techniques};
pub use completions::completions;
pub use config::config;
pub use journal::journal;

use crate::cli::args::OutputFormat;
use crate::config::{Config, Paths};
use crate::error::MindfulError;
use crate::features::breathing::{BreathingStorage, Catalog};
use crate::features::journal::JournalStorage;
use crate::storage::Database;

/// Everything a command needs: resolved paths, loaded config, and the
/// effective output format.
pub struct Context {
    /// Data and config locations.
    pub paths: Paths,
    /// Loaded configuration.
    pub config: Config,
    /// Output format for this invocation.
    pub format: OutputFormat,
}

impl Context {
    /// Load configuration from `paths` and pick the output format.
    ///
    /// `format` overrides the configured default when given.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load(paths: Paths, format: Option<OutputFormat>) -> Result<Self, MindfulError> {
        let config = Config::load_from_path(&paths.config_file)?;
        config.general.color.apply();
        let format = format.unwrap_or(config.general.default_output);
        Ok(Self {
            paths,
            config,
            format,
        })
    }

    /// Owner for stored records.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.config.general.user_id
    }

    /// The technique catalog including configured techniques.
    ///
    /// # Errors
    ///
    /// Returns an error if configured techniques are invalid.
    pub fn catalog(&self) -> Result<Catalog, MindfulError> {
        self.config.catalog()
    }

    /// Open breathing session storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn breathing_storage(&self) -> Result<BreathingStorage, MindfulError> {
        Ok(BreathingStorage::with_database(Database::open_with(&self.paths)?))
    }

    /// Open journal storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn journal_storage(&self) -> Result<JournalStorage, MindfulError> {
        Ok(JournalStorage::with_database(Database::open_with(&self.paths)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_context_uses_config_default_output() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().to_path_buf());
        std::fs::write(&paths.config_file, "general:\n  default_output: json\n").unwrap();

        let ctx = Context::load(paths.clone(), None).unwrap();
        assert_eq!(ctx.format, OutputFormat::Json);

        let ctx = Context::load(paths, Some(OutputFormat::Pretty)).unwrap();
        assert_eq!(ctx.format, OutputFormat::Pretty);
        assert_eq!(ctx.user_id(), "local");
    }
}
