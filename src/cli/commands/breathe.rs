//! Breathing command implementations.

use chrono::{Duration, Utc};
use colored::Colorize;
use serde_json::json;

use super::Context;
use crate::cli::args::OutputFormat;
use crate::error::MindfulError;
use crate::features::breathing::{
    BreathingReport, ManualClock, ReportPeriod, SessionRecorder, SessionRunner, TickEvent,
};
use crate::output::{
    format_history, format_report_pretty, format_seconds, format_session_pretty,
    format_techniques, to_json,
};
use crate::tui;

/// List the technique catalog.
///
/// # Errors
///
/// Returns an error if configured techniques are invalid.
pub fn techniques(ctx: &Context) -> Result<String, MindfulError> {
    let catalog = ctx.catalog()?;
    format_techniques(&catalog, &ctx.config.breathing.default_technique, ctx.format)
}

/// Run the interactive breathing view.
///
/// # Errors
///
/// Returns an error if the technique is unknown, storage cannot be opened,
/// or the terminal fails.
pub fn breathe(ctx: &Context, technique: Option<&str>) -> Result<String, MindfulError> {
    let catalog = ctx.catalog()?;
    let technique_id = technique.unwrap_or(&ctx.config.breathing.default_technique);
    let name = catalog.require(technique_id)?.name.clone();

    let recorder = SessionRecorder::new(ctx.breathing_storage()?, ctx.user_id());
    let app = tui::App::new(
        SessionRunner::new(catalog),
        recorder,
        technique_id,
        ctx.config.breathing.show_instructions,
    )?;
    let saved = tui::run(app)?;

    match ctx.format {
        OutputFormat::Json => to_json(&saved),
        OutputFormat::Pretty => {
            if saved.is_empty() {
                return Ok("No session recorded.".dimmed().to_string());
            }
            Ok(saved
                .iter()
                .map(|record| format_session_pretty(record, &name))
                .collect::<Vec<_>>()
                .join("\n\n"))
        }
    }
}

/// Run an exercise on a simulated clock and record the result.
///
/// The clock is set back so the simulated run ends at the current time.
///
/// # Errors
///
/// Returns an error if the technique is unknown or storage cannot be opened.
pub fn simulate(
    ctx: &Context,
    technique: Option<&str>,
    seconds: Option<u32>,
) -> Result<String, MindfulError> {
    let catalog = ctx.catalog()?;
    let technique_id = technique.unwrap_or(&ctx.config.breathing.default_technique);
    let target = catalog.require(technique_id)?;
    let name = target.name.clone();
    let ticks = seconds.unwrap_or_else(|| target.total_seconds());

    let clock = ManualClock::new(Utc::now() - Duration::seconds(i64::from(ticks)));
    let mut runner = SessionRunner::with_clock(catalog, clock.clone());
    runner.start(technique_id)?;

    let mut session = None;
    for _ in 0..ticks {
        clock.advance_secs(1);
        if let Some(TickEvent::Finished(finished)) = runner.tick() {
            session = Some(finished);
            break;
        }
    }
    let session = match session {
        Some(session) => session,
        None => runner
            .stop()
            .ok_or_else(|| MindfulError::InvalidInput("Simulated run did not start".to_string()))?,
    };

    let recorder = SessionRecorder::new(ctx.breathing_storage()?, ctx.user_id());
    let record = recorder
        .record(&session)
        .ok_or_else(|| MindfulError::Database("Failed to save session".to_string()))?;

    match ctx.format {
        OutputFormat::Json => to_json(&record),
        OutputFormat::Pretty => Ok(format_session_pretty(&record, &name)),
    }
}

/// Show recent sessions.
///
/// # Errors
///
/// Returns an error if storage cannot be read.
pub fn history(
    ctx: &Context,
    limit: usize,
    technique: Option<&str>,
) -> Result<String, MindfulError> {
    let storage = ctx.breathing_storage()?;
    let records = match technique {
        Some(id) => storage.by_technique(ctx.user_id(), id, limit)?,
        None => storage.recent(ctx.user_id(), limit)?,
    };
    let totals = storage.totals(ctx.user_id())?;

    format_history(&records, &totals, ctx.format)
}

/// Summarize practice over a period.
///
/// # Errors
///
/// Returns an error if storage cannot be read.
pub fn report(ctx: &Context, period: &str) -> Result<String, MindfulError> {
    let storage = ctx.breathing_storage()?;
    let report = BreathingReport::generate(&storage, ctx.user_id(), ReportPeriod::parse(period))?;

    match ctx.format {
        OutputFormat::Json => to_json(&report),
        OutputFormat::Pretty => Ok(format_report_pretty(&report)),
    }
}

/// Delete all of the user's sessions.
///
/// # Errors
///
/// Returns an error without `--force`, or if the delete fails.
pub fn clear(ctx: &Context, force: bool) -> Result<String, MindfulError> {
    if !force {
        return Err(MindfulError::InvalidInput(
            "This will delete all breathing session history.\nUse --force to confirm.".to_string(),
        ));
    }

    let mut storage = ctx.breathing_storage()?;
    let totals = storage.totals(ctx.user_id())?;
    let removed = storage.clear(ctx.user_id())?;

    match ctx.format {
        OutputFormat::Json => to_json(&json!({ "removed": removed })),
        OutputFormat::Pretty => Ok(format!(
            "Removed {removed} sessions ({} of breathing).",
            format_seconds(totals.seconds)
        )),
    }
}
