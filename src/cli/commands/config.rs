//! Configuration command implementations.

use serde_json::json;

use super::Context;
use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::config::Config;
use crate::error::MindfulError;
use crate::output::to_json;

/// Execute a config subcommand.
///
/// # Errors
///
/// Returns an error if the config file cannot be written, or already exists
/// and `--force` was not given.
pub fn config(ctx: &Context, cmd: ConfigCommands) -> Result<String, MindfulError> {
    match cmd {
        ConfigCommands::Show => match ctx.format {
            OutputFormat::Json => to_json(&ctx.config),
            OutputFormat::Pretty => ctx.config.to_yaml(),
        },
        ConfigCommands::Path => {
            let path = ctx.paths.config_file.display().to_string();
            match ctx.format {
                OutputFormat::Json => to_json(&json!({
                    "config": path,
                    "database": ctx.paths.database.display().to_string(),
                })),
                OutputFormat::Pretty => Ok(path),
            }
        }
        ConfigCommands::Init { force } => {
            let path = &ctx.paths.config_file;
            if path.exists() && !force {
                return Err(MindfulError::InvalidInput(format!(
                    "{} already exists. Use --force to overwrite.",
                    path.display()
                )));
            }
            ctx.paths.ensure_dirs()?;
            Config::default().save_to_path(path)?;
            Ok(format!("Wrote {}", path.display()))
        }
    }
}
