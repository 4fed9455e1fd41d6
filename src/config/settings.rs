//! Configuration settings for mindful.
//!
//! Settings are loaded from `config.yaml` in the data directory. Every
//! section is optional; missing keys take their defaults.

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::error::MindfulError;
use crate::features::breathing::{Catalog, Technique};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Breathing exercise settings.
    pub breathing: BreathingConfig,
    /// Extra or replacement techniques.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub techniques: Vec<Technique>,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Owner stamped on stored sessions and journal entries.
    pub user_id: String,
    /// Default output format.
    pub default_output: OutputFormat,
    /// Color output setting.
    pub color: ColorSetting,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorSetting {
    /// Apply the setting to `colored`'s global override.
    pub fn apply(self) {
        match self {
            Self::Auto => colored::control::unset_override(),
            Self::Always => colored::control::set_override(true),
            Self::Never => colored::control::set_override(false),
        }
    }
}

/// Breathing exercise settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BreathingConfig {
    /// Technique used when none is given on the command line.
    pub default_technique: String,
    /// Show phase guidance text in the exercise view.
    pub show_instructions: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            user_id: "local".to_string(),
            default_output: OutputFormat::Pretty,
            color: ColorSetting::Auto,
        }
    }
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            default_technique: "478".to_string(),
            show_instructions: true,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, MindfulError> {
        Self::load_from_path(&Paths::new()?.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, MindfulError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            MindfulError::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            MindfulError::Config(format!("Failed to parse config file {}: {e}", path.display()))
        })
    }

    /// Save configuration to the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save(&self) -> Result<(), MindfulError> {
        let paths = Paths::new()?;
        paths.ensure_dirs()?;
        self.save_to_path(&paths.config_file)
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), MindfulError> {
        std::fs::write(path, self.to_yaml()?).map_err(|e| {
            MindfulError::Config(format!("Failed to write config file {}: {e}", path.display()))
        })
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, MindfulError> {
        serde_yaml::to_string(self)
            .map_err(|e| MindfulError::Config(format!("Failed to serialize config: {e}")))
    }

    /// Technique catalog: built-ins merged with configured techniques.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured technique is invalid or the default
    /// technique is not in the resulting catalog.
    pub fn catalog(&self) -> Result<Catalog, MindfulError> {
        let catalog = Catalog::with_overrides(&self.techniques)?;
        if catalog.get(&self.breathing.default_technique).is_none() {
            return Err(MindfulError::Config(format!(
                "Default technique '{}' is not defined",
                self.breathing.default_technique
            )));
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.general.user_id, "local");
        assert_eq!(config.general.default_output, OutputFormat::Pretty);
        assert_eq!(config.general.color, ColorSetting::Auto);
        assert_eq!(config.breathing.default_technique, "478");
        assert!(config.breathing.show_instructions);
        assert!(config.techniques.is_empty());
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from_path(&temp_dir.path().join("config.yaml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut config = Config::default();
        config.general.user_id = "alice".to_string();
        config.breathing.default_technique = "box".to_string();
        config.save_to_path(&config_path).unwrap();

        let loaded = Config::load_from_path(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_with_techniques() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let yaml = r"
breathing:
  default_technique: sigh
techniques:
  - id: sigh
    name: Physiological Sigh
    target_cycles: 3
    phases:
      - name: inhale
        duration_seconds: 2
        instruction: Two short inhales
      - name: exhale
        duration_seconds: 6
";
        std::fs::write(&config_path, yaml).unwrap();

        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config.general.user_id, "local");
        assert!(config.breathing.show_instructions);

        let catalog = config.catalog().unwrap();
        let sigh = catalog.get("sigh").unwrap();
        assert_eq!(sigh.total_seconds(), 24);
        assert!(sigh.phases[1].instruction.is_empty());
    }

    #[test]
    fn test_unknown_default_technique() {
        let mut config = Config::default();
        config.breathing.default_technique = "missing".to_string();
        assert!(matches!(config.catalog(), Err(MindfulError::Config(_))));
    }

    #[test]
    fn test_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "general: [not, a, map]").unwrap();

        assert!(matches!(
            Config::load_from_path(&config_path),
            Err(MindfulError::Config(_))
        ));
    }
}
