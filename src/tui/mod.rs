//! Terminal User Interface (TUI) for breathing exercises.
//!
//! Shows the current phase and countdown, and ticks the session runner
//! once per second. Built with ratatui and crossterm.

mod app;
mod event;
mod ui;

pub use app::App;

use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::error::MindfulError;
use crate::features::breathing::{Clock, SessionRecord, SessionStore};

const TICK: Duration = Duration::from_secs(1);

/// Run the breathing view until the user quits.
///
/// Returns the sessions saved while the view was open.
///
/// # Errors
///
/// Returns an error if the terminal fails to initialize or draw.
pub fn run<S: SessionStore, C: Clock>(mut app: App<S, C>) -> Result<Vec<SessionRecord>, MindfulError> {
    enable_raw_mode().map_err(|e| MindfulError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| MindfulError::Terminal(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| MindfulError::Terminal(format!("Failed to create terminal: {e}")))?;

    let result = run_app(&mut terminal, &mut app);

    // A run interrupted by an error is still recorded.
    app.quit();

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result.map(|()| app.saved)
}

fn run_app<B: Backend, S: SessionStore, C: Clock>(
    terminal: &mut Terminal<B>,
    app: &mut App<S, C>,
) -> Result<(), MindfulError> {
    let mut last_tick = Instant::now();

    while !app.should_quit {
        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| MindfulError::Terminal(format!("Failed to draw: {e}")))?;

        let timeout = TICK.saturating_sub(last_tick.elapsed());
        if let Some(action) = event::poll_action(timeout)? {
            match action {
                event::Action::Quit => app.quit(),
                event::Action::Start => {
                    let was_running = app.is_running();
                    app.start();
                    if !was_running {
                        last_tick = Instant::now();
                    }
                }
                event::Action::Stop => app.stop(),
                event::Action::Reset => app.reset(),
            }
        }

        if last_tick.elapsed() >= TICK {
            if app.is_running() {
                app.on_tick();
            }
            last_tick += TICK;
            if last_tick.elapsed() >= TICK {
                // Fell behind (e.g. suspended); resync instead of bursting ticks.
                last_tick = Instant::now();
            }
        }
    }

    Ok(())
}
