//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::MindfulError;

/// Action to take after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Start or restart the exercise.
    Start,
    /// Stop early.
    Stop,
    /// Reset the exercise.
    Reset,
}

/// Wait up to `timeout` for a key press and map it to an action.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn poll_action(timeout: Duration) -> Result<Option<Action>, MindfulError> {
    if !event::poll(timeout).map_err(|e| MindfulError::Terminal(format!("Event poll failed: {e}")))? {
        return Ok(None);
    }

    match event::read().map_err(|e| MindfulError::Terminal(format!("Event read failed: {e}")))? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(map_key(key)),
        _ => Ok(None),
    }
}

/// Map a key press to an action.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(' ') | KeyCode::Enter => Some(Action::Start),
        KeyCode::Char('s') => Some(Action::Stop),
        KeyCode::Char('r') => Some(Action::Reset),
        _ => None,
    }
}
