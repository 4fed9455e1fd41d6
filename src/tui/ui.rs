//! UI rendering for the breathing view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::features::breathing::{Clock, PhaseKind, RunnerState, SessionStore};
use crate::tui::app::App;

/// Render the application UI.
pub fn render<S: SessionStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(7),    // Phase
            Constraint::Length(3), // Progress
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_phase(frame, app, chunks[1]);
    render_progress(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);
}

const fn phase_color(kind: PhaseKind) -> Color {
    match kind {
        PhaseKind::Inhale => Color::Cyan,
        PhaseKind::Hold => Color::Yellow,
        PhaseKind::Exhale => Color::Green,
    }
}

fn render_header<S: SessionStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect) {
    let catalog = app.runner.catalog();
    let title = catalog.get(&app.technique_id).map_or_else(
        || app.technique_id.clone(),
        |t| format!(" {} ({}) ", t.name, t.pattern()),
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta)),
        );

    frame.render_widget(header, area);
}

fn render_phase<S: SessionStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect) {
    let mut lines = Vec::new();

    match (app.runner.state(), app.runner.current_phase()) {
        (RunnerState::Running, Some(phase)) => {
            let color = phase_color(phase.name);
            lines.push(Line::from(Span::styled(
                phase.name.display_name().to_uppercase(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                app.runner.seconds_remaining().to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
            if app.show_instructions && !phase.instruction.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    phase.instruction.as_str(),
                    Style::default().fg(Color::Gray),
                )));
            }
        }
        (RunnerState::Completed, _) => {
            lines.push(Line::from(Span::styled(
                "COMPLETE",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )));
        }
        _ => {
            lines.push(Line::from(Span::styled(
                "READY",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )));
        }
    }

    let phase = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(phase, area);
}

fn render_progress<S: SessionStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect) {
    let target = app.runner.technique().map_or_else(
        || app.runner.catalog().get(&app.technique_id).map_or(0, |t| t.target_cycles),
        |t| t.target_cycles,
    );
    let label = format!("Cycle {} / {}", app.runner.cycles_completed(), target);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(app.runner.progress().clamp(0.0, 1.0))
        .label(label);

    frame.render_widget(gauge, area);
}

fn render_status_bar<S: SessionStore, C: Clock>(frame: &mut Frame<'_>, app: &App<S, C>, area: Rect) {
    let status_text = app
        .status
        .as_deref()
        .unwrap_or("space:start | s:stop | r:reset | q:quit");

    let status = Paragraph::new(status_text).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status, area);
}
