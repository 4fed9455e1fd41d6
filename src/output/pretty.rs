use colored::Colorize;

use crate::features::breathing::{BreathingReport, Catalog, SessionRecord, SessionTotals};
use crate::features::journal::JournalEntry;

/// Format seconds as MM:SS.
#[must_use]
pub fn format_mmss(seconds: i64) -> String {
    let seconds = seconds.abs();
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Format seconds as a human-readable duration such as "1 minute, 16 seconds".
#[must_use]
pub fn format_seconds(total: i64) -> String {
    fn unit(n: i64, name: &str) -> String {
        format!("{n} {name}{}", if n == 1 { "" } else { "s" })
    }

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(unit(hours, "hour"));
    }
    if minutes > 0 {
        parts.push(unit(minutes, "minute"));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(unit(seconds, "second"));
    }
    parts.join(", ")
}

/// Render a progress bar.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn render_progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64) as usize).min(width);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format the technique catalog.
#[must_use]
pub fn format_techniques_pretty(catalog: &Catalog, default_id: &str) -> String {
    let mut lines = vec![
        format!("Breathing Techniques ({})", catalog.len()).bold().to_string(),
        "─".repeat(60),
    ];

    for technique in catalog.iter() {
        let marker = if technique.id == default_id { "*" } else { " " };
        lines.push(format!(
            "{marker} {:<8} {:<20} {:<10} {} cycles, {}",
            technique.id.cyan(),
            technique.name,
            technique.pattern(),
            technique.target_cycles,
            format_mmss(i64::from(technique.total_seconds())).dimmed()
        ));

        let phases = technique
            .phases
            .iter()
            .map(|p| format!("{} {}s", p.name, p.duration_seconds))
            .collect::<Vec<_>>()
            .join(" → ");
        lines.push(format!("           {}", phases.dimmed()));
    }

    lines.push(String::new());
    lines.push("* default technique".dimmed().to_string());
    lines.join("\n")
}

/// Format one stored session.
#[must_use]
pub fn format_session_pretty(record: &SessionRecord, technique_name: &str) -> String {
    let (icon, status) = if record.completed {
        ("✅", "completed".green())
    } else {
        ("⏹️", "stopped early".yellow())
    };

    let mut lines = vec![format!("{icon} {technique_name} {status}")];
    lines.push(format!("   Duration: {}", format_seconds(record.duration_seconds)));
    lines.push(format!("   Cycles:   {}", record.cycles_completed));
    if let Some(id) = record.id {
        lines.push(format!("   Saved as #{id}").dimmed().to_string());
    }
    lines.join("\n")
}

/// Format session history with totals.
#[must_use]
pub fn format_history_pretty(records: &[SessionRecord], totals: &SessionTotals) -> String {
    if records.is_empty() {
        return "No breathing sessions yet.\n\nStart one with: mindful breathe".to_string();
    }

    let mut lines = vec![
        "Breathing History".bold().to_string(),
        "═".repeat(56),
        format!(
            "{:<6} {:<17} {:<9} {:>8} {:>7}  {}",
            "ID", "Date", "Technique", "Duration", "Cycles", "Status"
        ),
        "─".repeat(56),
    ];

    for record in records {
        let status = if record.completed {
            "✓".green()
        } else {
            "✗".red()
        };
        lines.push(format!(
            "{:<6} {:<17} {:<9} {:>8} {:>7}  {status}",
            record.id.map_or_else(|| "-".to_string(), |id| id.to_string()),
            record.created_at_local().format("%Y-%m-%d %H:%M"),
            record.technique,
            format_mmss(record.duration_seconds),
            record.cycles_completed,
        ));
    }

    lines.push("─".repeat(56));
    lines.push(format!(
        "{} sessions, {} completed, {} breathing",
        totals.sessions,
        totals.completed,
        format_seconds(totals.seconds)
    ));
    lines.join("\n")
}

/// Format a practice report.
#[must_use]
pub fn format_report_pretty(report: &BreathingReport) -> String {
    let mut lines = vec![
        format!("Breathing Report: {}", report.period).bold().to_string(),
        "═".repeat(50),
        format!("  Sessions:          {}", report.total_sessions),
        format!("  Completed:         {}", report.completed_sessions),
        format!("  Stopped early:     {}", report.partial_sessions),
        format!("  Time breathing:    {}", format_seconds(report.total_seconds)),
        format!("  Cycles:            {}", report.total_cycles),
        format!(
            "  Completion rate:   {:.0}%",
            report.completion_rate * 100.0
        ),
        format!("  Current streak:    {} days", report.streak_days),
    ];

    if let Some(favourite) = &report.favourite_technique {
        lines.push(format!("  Favourite:         {}", favourite.cyan()));
    }

    if !report.by_technique.is_empty() {
        lines.push(String::new());
        lines.push("By Technique".to_string());
        lines.push("─".repeat(40));
        for t in &report.by_technique {
            lines.push(format!(
                "  {:<10} {:>3} sessions ({} completed) {:>8}",
                t.technique,
                t.sessions,
                t.completed,
                format_mmss(t.seconds)
            ));
        }
    }

    if !report.daily.is_empty() {
        lines.push(String::new());
        lines.push("Recent Days".to_string());
        lines.push("─".repeat(40));
        for day in report.daily.iter().take(7) {
            lines.push(format!(
                "  {} {:>3} sessions {:>8}",
                day.date,
                day.sessions,
                format_mmss(day.seconds)
            ));
        }
    }

    lines.join("\n")
}

/// Format a list of journal entries.
#[must_use]
pub fn format_journal_pretty(entries: &[JournalEntry]) -> String {
    if entries.is_empty() {
        return "No journal entries yet.\n\nWrite one with: mindful journal add <title> <text>"
            .to_string();
    }

    let mut output = format!("Journal ({} entries)\n", entries.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for entry in entries {
        let mood = entry
            .mood
            .map_or_else(String::new, |m| format!(" [{m}]"));
        output.push_str(&format!(
            "#{:<4} {} {}{}\n",
            entry.id.unwrap_or_default(),
            entry.created_at_local().format("%Y-%m-%d").to_string().dimmed(),
            entry.title.bold(),
            mood.magenta()
        ));
        output.push_str(&format!("      {}\n", entry.preview(50).dimmed()));
    }

    output
}

/// Format a single journal entry.
#[must_use]
pub fn format_entry_pretty(entry: &JournalEntry) -> String {
    let mut output = format!("{}\n", entry.title.bold());
    output.push_str(&format!(
        "  {}: {}\n",
        "Written".dimmed(),
        entry.created_at_local().format("%Y-%m-%d %H:%M")
    ));
    if entry.updated_at != entry.created_at {
        output.push_str(&format!(
            "  {}: {}\n",
            "Edited".dimmed(),
            entry.updated_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
        ));
    }
    if let Some(mood) = entry.mood {
        output.push_str(&format!("  {}: {}\n", "Mood".dimmed(), mood));
    }
    output.push('\n');
    output.push_str(&entry.content);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::breathing::Session;
    use chrono::{Duration, Utc};

    #[test]
    fn test_format_mmss() {
        assert_eq!(format_mmss(76), "01:16");
        assert_eq!(format_mmss(0), "00:00");
        assert_eq!(format_mmss(600), "10:00");
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0), "0 seconds");
        assert_eq!(format_seconds(1), "1 second");
        assert_eq!(format_seconds(76), "1 minute, 16 seconds");
        assert_eq!(format_seconds(3600), "1 hour");
        assert_eq!(format_seconds(7260), "2 hours, 1 minute");
    }

    #[test]
    fn test_render_progress_bar() {
        let bar = render_progress_bar(0.5, 10);
        assert!(bar.contains("█████"));
        assert!(bar.contains("░░░░░"));
        assert_eq!(render_progress_bar(2.0, 4), "[████]");
    }

    #[test]
    fn test_techniques_pretty_lists_all() {
        let catalog = Catalog::builtin();
        let output = format_techniques_pretty(&catalog, "478");
        for technique in catalog.iter() {
            assert!(output.contains(&technique.name));
        }
        assert!(output.contains("4-7-8"));
    }

    #[test]
    fn test_history_pretty_empty() {
        let output = format_history_pretty(&[], &SessionTotals::default());
        assert!(output.contains("No breathing sessions"));
    }

    #[test]
    fn test_session_pretty() {
        let start = Utc::now();
        let session = Session::new("478", start, start + Duration::seconds(5), 0, false);
        let record = SessionRecord::from_session(&session, "local");
        let output = format_session_pretty(&record, "4-7-8 Breathing");

        assert!(output.contains("stopped early"));
        assert!(output.contains("5 seconds"));
    }
}
