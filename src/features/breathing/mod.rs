//! Breathing exercises.
//!
//! - Technique catalog (built-in plus configured techniques)
//! - Session runner: phase sequencing, countdown, cycle counting
//! - Session recording and history
//! - Practice reports

pub mod clock;
pub mod engine;
pub mod recorder;
pub mod report;
pub mod session;
pub mod storage;
pub mod technique;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{RunnerState, SessionRunner, TickEvent};
pub use recorder::{SessionRecorder, SessionStore};
pub use report::{BreathingReport, ReportPeriod};
pub use session::{Session, SessionRecord};
pub use storage::{BreathingStorage, SessionTotals};
pub use technique::{Catalog, Phase, PhaseKind, Technique, BUILTIN_TECHNIQUES};
