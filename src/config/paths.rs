//! Path resolution for mindful configuration and data files.
//!
//! All data lives in `~/.mindful/` unless `MINDFUL_HOME` points elsewhere:
//! - `config.yaml` - configuration file
//! - `mindful.db` - SQLite database for sessions and journal entries

use std::path::PathBuf;

use crate::error::MindfulError;

/// Environment variable that overrides the data directory.
pub const HOME_ENV: &str = "MINDFUL_HOME";

/// Paths to mindful configuration and data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Root directory
    pub root: PathBuf,
    /// Config file
    pub config_file: PathBuf,
    /// Database file
    pub database: PathBuf,
}

impl Paths {
    /// Resolve paths from `MINDFUL_HOME`, falling back to `~/.mindful`.
    ///
    /// # Errors
    ///
    /// Returns an error if neither `MINDFUL_HOME` nor `HOME` is set.
    pub fn new() -> Result<Self, MindfulError> {
        if let Some(root) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var_os("HOME")
            .ok_or_else(|| MindfulError::Config("Could not determine home directory".to_string()))?;
        Ok(Self::with_root(PathBuf::from(home).join(".mindful")))
    }

    /// Create paths under a custom root directory.
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("mindful.db"),
            root,
        }
    }

    /// Create the root directory if it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), MindfulError> {
        std::fs::create_dir_all(&self.root).map_err(|e| {
            MindfulError::Config(format!(
                "Failed to create directory {}: {e}",
                self.root.display()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_with_root() {
        let root = PathBuf::from("/tmp/test-mindful");
        let paths = Paths::with_root(root.clone());

        assert_eq!(paths.root, root);
        assert_eq!(paths.config_file, root.join("config.yaml"));
        assert_eq!(paths.database, root.join("mindful.db"));
    }

    #[test]
    fn test_ensure_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join("nested").join("mindful"));

        paths.ensure_dirs().unwrap();
        paths.ensure_dirs().unwrap();

        assert!(paths.root.is_dir());
    }
}
