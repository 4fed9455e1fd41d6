//! The breathing session runner.
//!
//! A deterministic state machine driven by an external one-second tick.
//! The runner never performs I/O: a finished or stopped run comes back to
//! the caller as a `Session` to hand to a `SessionStore`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use super::session::Session;
use super::technique::{Catalog, Phase, Technique};
use crate::error::MindfulError;

/// Runner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunnerState {
    /// No run in progress
    Idle,
    /// A run is counting down
    Running,
    /// The last run reached its target cycle count
    Completed,
}

impl std::fmt::Display for RunnerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Running => write!(f, "Running"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

/// What a tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickEvent {
    /// The current phase counted down one second
    Countdown {
        /// Seconds left in the phase
        seconds_remaining: u32,
    },
    /// The next phase of the same cycle began
    PhaseStarted {
        /// Index of the new phase
        phase_index: usize,
    },
    /// A cycle finished and the next one began
    CycleCompleted {
        /// Cycles finished so far
        cycles_completed: u32,
    },
    /// The target was reached; the run is over
    Finished(Session),
}

/// Progress of the active run.
#[derive(Debug, Clone)]
struct ActiveRun {
    technique: Technique,
    started_at: DateTime<Utc>,
    phase_index: usize,
    seconds_remaining: u32,
    cycles_completed: u32,
    elapsed_ticks: u32,
}

impl ActiveRun {
    fn phase(&self) -> &Phase {
        &self.technique.phases[self.phase_index]
    }
}

/// Drives a single breathing exercise from start to completion or stop.
pub struct SessionRunner<C: Clock = SystemClock> {
    catalog: Catalog,
    clock: C,
    state: RunnerState,
    run: Option<ActiveRun>,
}

impl SessionRunner<SystemClock> {
    /// Create a runner on the wall clock.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self::with_clock(catalog, SystemClock)
    }
}

impl<C: Clock> SessionRunner<C> {
    /// Create a runner with a specific time source.
    #[must_use]
    pub const fn with_clock(catalog: Catalog, clock: C) -> Self {
        Self {
            catalog,
            clock,
            state: RunnerState::Idle,
            run: None,
        }
    }

    /// Begin a run of `technique_id`.
    ///
    /// Returns `Ok(false)` without touching the current run if one is
    /// already in progress.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::InvalidTechnique` if the id is not in the
    /// catalog. State is left unchanged.
    pub fn start(&mut self, technique_id: &str) -> Result<bool, MindfulError> {
        let technique = self.catalog.require(technique_id)?.clone();

        if self.state == RunnerState::Running {
            warn!(technique = technique_id, "start ignored, a run is already in progress");
            return Ok(false);
        }

        let seconds_remaining = technique.phases[0].duration_seconds;
        debug!(
            technique = technique_id,
            target_cycles = technique.target_cycles,
            "breathing run started"
        );

        self.run = Some(ActiveRun {
            technique,
            started_at: self.clock.now(),
            phase_index: 0,
            seconds_remaining,
            cycles_completed: 0,
            elapsed_ticks: 0,
        });
        self.state = RunnerState::Running;
        Ok(true)
    }

    /// Advance the run by one second.
    ///
    /// Returns `None` when no run is in progress.
    pub fn tick(&mut self) -> Option<TickEvent> {
        if self.state != RunnerState::Running {
            return None;
        }
        let run = self.run.as_mut()?;

        run.elapsed_ticks += 1;
        run.seconds_remaining = run.seconds_remaining.saturating_sub(1);
        if run.seconds_remaining > 0 {
            return Some(TickEvent::Countdown {
                seconds_remaining: run.seconds_remaining,
            });
        }

        if run.phase_index < run.technique.last_phase_index() {
            run.phase_index += 1;
            run.seconds_remaining = run.phase().duration_seconds;
            debug!(phase = %run.phase().name, index = run.phase_index, "phase started");
            return Some(TickEvent::PhaseStarted {
                phase_index: run.phase_index,
            });
        }

        run.cycles_completed += 1;
        if run.cycles_completed >= run.technique.target_cycles {
            let session = Session::new(
                &run.technique.id,
                run.started_at,
                self.clock.now(),
                run.cycles_completed,
                true,
            );
            info!(
                technique = %session.technique_id,
                cycles = session.cycles_completed,
                duration_seconds = session.duration_seconds,
                "breathing run completed"
            );
            self.state = RunnerState::Completed;
            return Some(TickEvent::Finished(session));
        }

        run.phase_index = 0;
        run.seconds_remaining = run.phase().duration_seconds;
        debug!(cycles = run.cycles_completed, "cycle completed");
        Some(TickEvent::CycleCompleted {
            cycles_completed: run.cycles_completed,
        })
    }

    /// End the run early.
    ///
    /// Always emits a partial session for a run in progress, even when no
    /// cycle has finished. Returns `None` if nothing is running.
    pub fn stop(&mut self) -> Option<Session> {
        if self.state != RunnerState::Running {
            return None;
        }
        let run = self.run.as_ref()?;

        let session = Session::new(
            &run.technique.id,
            run.started_at,
            self.clock.now(),
            run.cycles_completed,
            false,
        );
        info!(
            technique = %session.technique_id,
            cycles = session.cycles_completed,
            duration_seconds = session.duration_seconds,
            "breathing run stopped"
        );

        self.state = RunnerState::Idle;
        Some(session)
    }

    /// Stop any run in progress and clear all counters.
    ///
    /// Only a run still in progress produces a session; one that already
    /// completed or was stopped is not emitted again.
    pub fn reset(&mut self) -> Option<Session> {
        let session = self.stop();
        self.run = None;
        self.state = RunnerState::Idle;
        session
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> RunnerState {
        self.state
    }

    /// Whether a run is counting down.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == RunnerState::Running
    }

    /// Catalog the runner starts techniques from.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Technique of the current or last run.
    #[must_use]
    pub fn technique(&self) -> Option<&Technique> {
        self.run.as_ref().map(|r| &r.technique)
    }

    /// Phase of the current or last run.
    #[must_use]
    pub fn current_phase(&self) -> Option<&Phase> {
        self.run.as_ref().map(ActiveRun::phase)
    }

    /// Index of the current phase.
    #[must_use]
    pub fn phase_index(&self) -> usize {
        self.run.as_ref().map_or(0, |r| r.phase_index)
    }

    /// Seconds left in the current phase.
    #[must_use]
    pub fn seconds_remaining(&self) -> u32 {
        match (&self.run, self.state) {
            (Some(_), RunnerState::Completed) | (None, _) => 0,
            (Some(run), _) => run.seconds_remaining,
        }
    }

    /// Cycles finished in the current or last run.
    #[must_use]
    pub fn cycles_completed(&self) -> u32 {
        self.run.as_ref().map_or(0, |r| r.cycles_completed)
    }

    /// Fraction of the full session already breathed (0.0 - 1.0).
    #[must_use]
    pub fn progress(&self) -> f64 {
        let Some(run) = &self.run else {
            return 0.0;
        };
        let total = run.technique.total_seconds();
        if total == 0 {
            return 1.0;
        }
        (f64::from(run.elapsed_ticks) / f64::from(total)).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::breathing::clock::ManualClock;
    use crate::features::breathing::technique::PhaseKind;

    fn runner() -> (SessionRunner<ManualClock>, ManualClock) {
        let clock = ManualClock::default();
        (SessionRunner::with_clock(Catalog::builtin(), clock.clone()), clock)
    }

    /// Tick once per simulated second, collecting finished sessions.
    fn tick_n(runner: &mut SessionRunner<ManualClock>, clock: &ManualClock, n: u32) -> Vec<Session> {
        let mut finished = Vec::new();
        for _ in 0..n {
            clock.advance_secs(1);
            if let Some(TickEvent::Finished(session)) = runner.tick() {
                finished.push(session);
            }
        }
        finished
    }

    #[test]
    fn test_initial_state() {
        let (runner, _) = runner();
        assert_eq!(runner.state(), RunnerState::Idle);
        assert!(runner.technique().is_none());
        assert_eq!(runner.cycles_completed(), 0);
        assert_eq!(runner.seconds_remaining(), 0);
    }

    #[test]
    fn test_start_sets_first_phase() {
        let (mut runner, _) = runner();
        assert!(runner.start("478").unwrap());

        assert_eq!(runner.state(), RunnerState::Running);
        assert_eq!(runner.phase_index(), 0);
        assert_eq!(runner.seconds_remaining(), 4);
        assert_eq!(runner.current_phase().unwrap().name, PhaseKind::Inhale);
        assert_eq!(runner.cycles_completed(), 0);
    }

    #[test]
    fn test_start_unknown_technique_leaves_state() {
        let (mut runner, clock) = runner();
        let err = runner.start("nope").unwrap_err();
        assert!(matches!(err, MindfulError::InvalidTechnique(_)));
        assert_eq!(runner.state(), RunnerState::Idle);

        runner.start("box").unwrap();
        tick_n(&mut runner, &clock, 3);
        assert!(runner.start("nope").is_err());
        assert_eq!(runner.technique().unwrap().id, "box");
        assert_eq!(runner.seconds_remaining(), 1);
    }

    #[test]
    fn test_double_start_is_noop() {
        let (mut runner, clock) = runner();
        runner.start("478").unwrap();
        tick_n(&mut runner, &clock, 2);

        assert!(!runner.start("box").unwrap());
        assert_eq!(runner.technique().unwrap().id, "478");
        assert_eq!(runner.seconds_remaining(), 2);
    }

    #[test]
    fn test_phase_sequence_478() {
        let (mut runner, _) = runner();
        runner.start("478").unwrap();

        for expected in [3, 2, 1] {
            assert_eq!(
                runner.tick(),
                Some(TickEvent::Countdown { seconds_remaining: expected })
            );
        }
        assert_eq!(runner.tick(), Some(TickEvent::PhaseStarted { phase_index: 1 }));
        assert_eq!(runner.current_phase().unwrap().name, PhaseKind::Hold);
        assert_eq!(runner.seconds_remaining(), 7);
    }

    #[test]
    fn test_one_cycle_after_19_ticks() {
        let (mut runner, clock) = runner();
        runner.start("478").unwrap();

        tick_n(&mut runner, &clock, 18);
        assert_eq!(runner.cycles_completed(), 0);
        assert_eq!(runner.phase_index(), 2);

        clock.advance_secs(1);
        assert_eq!(runner.tick(), Some(TickEvent::CycleCompleted { cycles_completed: 1 }));
        assert_eq!(runner.phase_index(), 0);
        assert_eq!(runner.seconds_remaining(), 4);
    }

    #[test]
    fn test_full_478_run() {
        let (mut runner, clock) = runner();
        runner.start("478").unwrap();

        let finished = tick_n(&mut runner, &clock, 76);

        assert_eq!(finished.len(), 1);
        let session = &finished[0];
        assert!(session.completed);
        assert_eq!(session.cycles_completed, 4);
        assert_eq!(session.duration_seconds, 76);
        assert_eq!(session.technique_id, "478");
        assert_eq!(runner.state(), RunnerState::Completed);
        assert!((runner.progress() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_every_technique_completes_exactly_on_target() {
        let catalog = Catalog::builtin();
        for technique in catalog.iter() {
            let clock = ManualClock::default();
            let mut runner = SessionRunner::with_clock(catalog.clone(), clock.clone());
            runner.start(&technique.id).unwrap();

            let total = technique.total_seconds();
            let finished = tick_n(&mut runner, &clock, total - 1);
            assert!(finished.is_empty(), "{} finished early", technique.id);

            let finished = tick_n(&mut runner, &clock, 1);
            assert_eq!(finished.len(), 1, "{} did not finish", technique.id);
            assert!(finished[0].completed);
            assert_eq!(finished[0].cycles_completed, technique.target_cycles);
        }
    }

    #[test]
    fn test_cycles_never_exceed_target() {
        let (mut runner, clock) = runner();
        runner.start("equal").unwrap();

        let mut last = 0;
        for _ in 0..200 {
            clock.advance_secs(1);
            runner.tick();
            let cycles = runner.cycles_completed();
            assert!(cycles >= last);
            assert!(cycles <= 6);
            last = cycles;
        }
        assert_eq!(last, 6);
    }

    #[test]
    fn test_tick_after_completion_is_noop() {
        let (mut runner, clock) = runner();
        runner.start("478").unwrap();
        tick_n(&mut runner, &clock, 76);

        let more = tick_n(&mut runner, &clock, 30);
        assert!(more.is_empty());
        assert_eq!(runner.tick(), None);
        assert_eq!(runner.cycles_completed(), 4);
        assert_eq!(runner.stop(), None);
    }

    #[test]
    fn test_tick_while_idle_is_noop() {
        let (mut runner, _) = runner();
        assert_eq!(runner.tick(), None);
        assert_eq!(runner.state(), RunnerState::Idle);
    }

    #[test]
    fn test_stop_mid_hold_emits_partial() {
        let (mut runner, clock) = runner();
        runner.start("478").unwrap();
        tick_n(&mut runner, &clock, 5);
        assert_eq!(runner.current_phase().unwrap().name, PhaseKind::Hold);

        let session = runner.stop().unwrap();
        assert!(!session.completed);
        assert_eq!(session.cycles_completed, 0);
        assert_eq!(session.duration_seconds, 5);
        assert_eq!(runner.state(), RunnerState::Idle);
    }

    #[test]
    fn test_stop_immediately_still_emits() {
        let (mut runner, _) = runner();
        runner.start("box").unwrap();

        let session = runner.stop().unwrap();
        assert_eq!(session.cycles_completed, 0);
        assert_eq!(session.duration_seconds, 0);
        assert!(!session.completed);
    }

    #[test]
    fn test_stop_after_k_cycles() {
        let (mut runner, clock) = runner();
        runner.start("box").unwrap();
        tick_n(&mut runner, &clock, 16 * 2 + 3);

        let session = runner.stop().unwrap();
        assert!(!session.completed);
        assert_eq!(session.cycles_completed, 2);
    }

    #[test]
    fn test_stop_twice_emits_once() {
        let (mut runner, _) = runner();
        runner.start("478").unwrap();
        assert!(runner.stop().is_some());
        assert!(runner.stop().is_none());
        assert!(runner.reset().is_none());
    }

    #[test]
    fn test_reset_running_emits_and_clears() {
        let (mut runner, clock) = runner();
        runner.start("478").unwrap();
        tick_n(&mut runner, &clock, 20);

        let session = runner.reset().unwrap();
        assert_eq!(session.cycles_completed, 1);
        assert_eq!(runner.state(), RunnerState::Idle);
        assert!(runner.technique().is_none());
        assert_eq!(runner.cycles_completed(), 0);
    }

    #[test]
    fn test_reset_after_completion_does_not_reemit() {
        let (mut runner, clock) = runner();
        runner.start("equal").unwrap();
        tick_n(&mut runner, &clock, 48);
        assert_eq!(runner.state(), RunnerState::Completed);

        assert!(runner.reset().is_none());
        assert_eq!(runner.state(), RunnerState::Idle);
    }

    #[test]
    fn test_restart_after_completion() {
        let (mut runner, clock) = runner();
        runner.start("equal").unwrap();
        tick_n(&mut runner, &clock, 48);

        assert!(runner.start("478").unwrap());
        assert_eq!(runner.cycles_completed(), 0);
        assert_eq!(runner.seconds_remaining(), 4);
    }
}
