//! Per-window display counter.
//!
//! The engine does not use internal threads or read the clock; the caller
//! drives it by invoking `tick()` once per period (see [`super::Ticker`]).
//!
//! ## States
//!
//! ```text
//! Frozen <-> Running
//! ```
//!
//! While running, each tick advances the counter by one second. External
//! authoritative values replace the counter wholesale via `seed()`; the
//! engine never tries to reconcile drift on its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{displayed_total, SubtaskStatus, TimeSession};
use crate::task::Subtask;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    #[default]
    Frozen,
    Running,
}

/// Ticking seconds counter for one displayed subtask.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerEngine {
    seconds: u64,
    state: TimerState,
    /// Ticks applied since the last seed.
    #[serde(default)]
    ticks_since_seed: u64,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from the reconstruction formula; runs only while in progress.
    pub fn from_reconstruction(
        subtask: &Subtask,
        session: Option<&TimeSession>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut engine = Self::new();
        engine.seed(
            displayed_total(subtask, session, now),
            subtask.status == SubtaskStatus::InProgress,
        );
        engine
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn ticks_since_seed(&self) -> u64 {
        self.ticks_since_seed
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Replace the counter with an authoritative value.
    pub fn seed(&mut self, seconds: u64, running: bool) {
        self.seconds = seconds;
        self.state = if running {
            TimerState::Running
        } else {
            TimerState::Frozen
        };
        self.ticks_since_seed = 0;
    }

    pub fn run(&mut self) {
        self.state = TimerState::Running;
    }

    pub fn freeze(&mut self) {
        self.state = TimerState::Frozen;
    }

    /// Call once per period. Returns the new value if the counter advanced.
    pub fn tick(&mut self) -> Option<u64> {
        match self.state {
            TimerState::Running => {
                self.seconds += 1;
                self.ticks_since_seed += 1;
                Some(self.seconds)
            }
            TimerState::Frozen => None,
        }
    }
}

/// Format seconds as `HH:MM:SS`.
pub fn format_hms(seconds: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}
