//! Breathing techniques and the technique catalog.
//!
//! A technique is an ordered list of timed phases repeated for a fixed
//! number of cycles. The catalog is the single table both the engine and
//! the presentation layer read from.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::MindfulError;

/// Kind of a breathing phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    /// Breathe in
    Inhale,
    /// Hold the breath
    Hold,
    /// Breathe out
    Exhale,
}

impl PhaseKind {
    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Inhale => "Inhale",
            Self::Hold => "Hold",
            Self::Exhale => "Exhale",
        }
    }
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One timed segment of a breathing cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    /// Phase kind
    pub name: PhaseKind,
    /// Countdown length in seconds
    pub duration_seconds: u32,
    /// Guidance shown while the phase runs
    #[serde(default)]
    pub instruction: String,
}

impl Phase {
    /// Create a phase.
    #[must_use]
    pub fn new(name: PhaseKind, duration_seconds: u32, instruction: &str) -> Self {
        Self {
            name,
            duration_seconds,
            instruction: instruction.to_string(),
        }
    }
}

/// A named breathing pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technique {
    /// Unique key, e.g. `478`
    pub id: String,
    /// Display label
    pub name: String,
    /// Full cycles that make up a complete session
    pub target_cycles: u32,
    /// Phases of one cycle, in order
    pub phases: Vec<Phase>,
}

impl Technique {
    /// Seconds in one full cycle, saturating at `u32::MAX`.
    #[must_use]
    pub fn cycle_seconds(&self) -> u32 {
        self.phases
            .iter()
            .fold(0u32, |acc, p| acc.saturating_add(p.duration_seconds))
    }

    /// Seconds in a complete session, saturating at `u32::MAX`.
    #[must_use]
    pub fn total_seconds(&self) -> u32 {
        self.checked_total_seconds().unwrap_or(u32::MAX)
    }

    fn checked_total_seconds(&self) -> Option<u32> {
        self.phases
            .iter()
            .try_fold(0u32, |acc, p| acc.checked_add(p.duration_seconds))?
            .checked_mul(self.target_cycles)
    }

    /// Index of the phase that closes a cycle.
    #[must_use]
    pub fn last_phase_index(&self) -> usize {
        self.phases.len().saturating_sub(1)
    }

    /// Short pattern string such as `4-7-8`.
    #[must_use]
    pub fn pattern(&self) -> String {
        self.phases
            .iter()
            .map(|p| p.duration_seconds.to_string())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Check the structural rules a technique must satisfy.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::Config` if the id is blank, there are no phases,
    /// any phase has a zero duration, the target cycle count is zero, or the
    /// full session does not fit in a `u32` second count.
    pub fn validate(&self) -> Result<(), MindfulError> {
        if self.id.trim().is_empty() {
            return Err(MindfulError::Config("Technique id cannot be empty".to_string()));
        }
        if self.phases.is_empty() {
            return Err(MindfulError::Config(format!(
                "Technique '{}' has no phases",
                self.id
            )));
        }
        if self.target_cycles == 0 {
            return Err(MindfulError::Config(format!(
                "Technique '{}' must target at least one cycle",
                self.id
            )));
        }
        if let Some(phase) = self.phases.iter().find(|p| p.duration_seconds == 0) {
            return Err(MindfulError::Config(format!(
                "Technique '{}' has a zero-length {} phase",
                self.id, phase.name
            )));
        }
        if self.checked_total_seconds().is_none() {
            return Err(MindfulError::Config(format!(
                "Technique '{}' is too long",
                self.id
            )));
        }
        Ok(())
    }
}

/// Built-in techniques.
pub static BUILTIN_TECHNIQUES: Lazy<Vec<Technique>> = Lazy::new(|| {
    vec![
        Technique {
            id: "478".to_string(),
            name: "4-7-8 Breathing".to_string(),
            target_cycles: 4,
            phases: vec![
                Phase::new(PhaseKind::Inhale, 4, "Breathe in quietly through your nose"),
                Phase::new(PhaseKind::Hold, 7, "Hold your breath"),
                Phase::new(PhaseKind::Exhale, 8, "Exhale completely through your mouth"),
            ],
        },
        Technique {
            id: "box".to_string(),
            name: "Box Breathing".to_string(),
            target_cycles: 4,
            phases: vec![
                Phase::new(PhaseKind::Inhale, 4, "Breathe in slowly"),
                Phase::new(PhaseKind::Hold, 4, "Hold at the top"),
                Phase::new(PhaseKind::Exhale, 4, "Breathe out slowly"),
                Phase::new(PhaseKind::Hold, 4, "Hold at the bottom"),
            ],
        },
        Technique {
            id: "equal".to_string(),
            name: "Equal Breathing".to_string(),
            target_cycles: 6,
            phases: vec![
                Phase::new(PhaseKind::Inhale, 4, "Breathe in through your nose"),
                Phase::new(PhaseKind::Exhale, 4, "Breathe out through your nose"),
            ],
        },
        Technique {
            id: "deep".to_string(),
            name: "Deep Breathing".to_string(),
            target_cycles: 5,
            phases: vec![
                Phase::new(PhaseKind::Inhale, 5, "Fill your belly, then your chest"),
                Phase::new(PhaseKind::Hold, 2, "Pause gently"),
                Phase::new(PhaseKind::Exhale, 7, "Let the air out slowly"),
            ],
        },
    ]
});

/// Read-only table of techniques keyed by id.
#[derive(Debug, Clone)]
pub struct Catalog {
    techniques: Vec<Technique>,
}

impl Catalog {
    /// Catalog with only the built-in techniques.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            techniques: BUILTIN_TECHNIQUES.clone(),
        }
    }

    /// Built-in techniques merged with configured ones.
    ///
    /// A configured technique whose id matches a built-in replaces it;
    /// new ids are appended in the order given.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::Config` if any configured technique is invalid
    /// or two configured techniques share an id.
    pub fn with_overrides(overrides: &[Technique]) -> Result<Self, MindfulError> {
        let mut catalog = Self::builtin();
        let mut seen = Vec::new();

        for technique in overrides {
            technique.validate()?;
            if seen.contains(&technique.id) {
                return Err(MindfulError::Config(format!(
                    "Technique '{}' is defined more than once",
                    technique.id
                )));
            }
            seen.push(technique.id.clone());

            match catalog.techniques.iter_mut().find(|t| t.id == technique.id) {
                Some(existing) => *existing = technique.clone(),
                None => catalog.techniques.push(technique.clone()),
            }
        }

        Ok(catalog)
    }

    /// Look up a technique by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Technique> {
        self.techniques.iter().find(|t| t.id == id)
    }

    /// Look up a technique, failing with `InvalidTechnique` when unknown.
    ///
    /// # Errors
    ///
    /// Returns `MindfulError::InvalidTechnique` if the id is not in the catalog.
    pub fn require(&self, id: &str) -> Result<&Technique, MindfulError> {
        self.get(id)
            .ok_or_else(|| MindfulError::InvalidTechnique(id.to_string()))
    }

    /// Iterate techniques in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Technique> {
        self.techniques.iter()
    }

    /// Number of techniques.
    #[must_use]
    pub fn len(&self) -> usize {
        self.techniques.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.techniques.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
