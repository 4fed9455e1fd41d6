//! Application state for the breathing view.

use crate::error::MindfulError;
use crate::features::breathing::{
    Clock, RunnerState, Session, SessionRecord, SessionRecorder, SessionRunner, SessionStore, SystemClock,
    TickEvent,
};

/// Application state.
pub struct App<S: SessionStore, C: Clock = SystemClock> {
    /// The session runner.
    pub runner: SessionRunner<C>,
    recorder: SessionRecorder<S>,
    /// Technique started by space/enter.
    pub technique_id: String,
    /// Whether to show phase guidance.
    pub show_instructions: bool,
    /// Status message to display.
    pub status: Option<String>,
    /// Sessions saved while the view was open.
    pub saved: Vec<SessionRecord>,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl<S: SessionStore, C: Clock> App<S, C> {
    /// Create a new app instance.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::InvalidTechnique` if the technique is not in
    /// the runner's catalog.
    pub fn new(
        runner: SessionRunner<C>,
        recorder: SessionRecorder<S>,
        technique_id: &str,
        show_instructions: bool,
    ) -> Result<Self, MindfulError> {
        let technique = runner.catalog().require(technique_id)?;
        let status = format!("{} - press space to begin", technique.name);

        Ok(Self {
            runner,
            recorder,
            technique_id: technique_id.to_string(),
            show_instructions,
            status: Some(status),
            saved: Vec::new(),
            should_quit: false,
        })
    }

    /// Start the exercise, or restart it after completion.
    pub fn start(&mut self) {
        match self.runner.start(&self.technique_id) {
            Ok(true) => self.status = None,
            Ok(false) => {}
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    /// Advance the exercise by one second.
    pub fn on_tick(&mut self) {
        match self.runner.tick() {
            Some(TickEvent::CycleCompleted { cycles_completed }) => {
                let target = self.runner.technique().map_or(0, |t| t.target_cycles);
                self.status = Some(format!("Cycle {cycles_completed} of {target} complete"));
            }
            Some(TickEvent::Finished(session)) => {
                self.status = Some("Well done! Press space to go again or q to quit".to_string());
                self.save(&session);
            }
            Some(TickEvent::PhaseStarted { .. } | TickEvent::Countdown { .. }) | None => {}
        }
    }

    /// Stop early, saving a partial session.
    pub fn stop(&mut self) {
        if let Some(session) = self.runner.stop() {
            self.status = Some("Stopped. Press space to start again".to_string());
            self.save(&session);
        }
    }

    /// Reset the view, saving a partial session if one was running.
    pub fn reset(&mut self) {
        self.status = Some("Reset. Press space to begin".to_string());
        if let Some(session) = self.runner.reset() {
            self.save(&session);
        }
    }

    /// Quit, saving a partial session if one was running.
    pub fn quit(&mut self) {
        self.stop();
        self.should_quit = true;
    }

    /// Whether the runner needs ticks.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.runner.state() == RunnerState::Running
    }

    fn save(&mut self, session: &Session) {
        match self.recorder.record(session) {
            Some(record) => self.saved.push(record),
            None => {
                self.status = Some("Could not save this session (see log)".to_string());
            }
        }
    }
}
