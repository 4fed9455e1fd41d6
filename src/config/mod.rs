//! Configuration management for mindful.
//!
//! This module handles loading and saving configuration from `~/.mindful/`.

mod paths;
mod settings;

pub use paths::{Paths, HOME_ENV};
pub use settings::{BreathingConfig, ColorSetting, Config, GeneralConfig};
