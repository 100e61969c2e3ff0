//! Subtask session lifecycle.
//!
//! A subtask moves through
//!
//! ```text
//! todo ──start──> in_progress <──pause/resume──> paused
//!                      │                            │
//!                      └──────────complete──────────┴──> done (terminal)
//! ```
//!
//! Each `start` opens one [`TimeSession`]; pause/resume move its committed
//! duration forward; `complete` closes it and folds the submitted total into
//! the subtask. The elapsed-time reconstruction in [`elapsed`] is the single
//! formula every window uses to display or submit a "current total".

pub mod elapsed;
mod machine;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use elapsed::{displayed_total, live_elapsed_seconds, ElapsedBreakdown};
pub use machine::{SessionStateMachine, MAX_TRACKED_SECONDS};

/// Status of a subtask. `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubtaskStatus {
    #[default]
    Todo,
    InProgress,
    Paused,
    Done,
}

impl SubtaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubtaskStatus::Todo => "todo",
            SubtaskStatus::InProgress => "in_progress",
            SubtaskStatus::Paused => "paused",
            SubtaskStatus::Done => "done",
        }
    }

    /// Status reached by applying `action`, or `None` if the action is illegal.
    pub fn after(&self, action: SessionAction) -> Option<SubtaskStatus> {
        use SessionAction::*;
        use SubtaskStatus::*;
        match (self, action) {
            (Todo, Start) => Some(InProgress),
            (InProgress, Pause) => Some(Paused),
            (Paused, Resume) => Some(InProgress),
            (InProgress | Paused, Complete) => Some(Done),
            _ => None,
        }
    }

    /// Actions accepted from this status.
    pub fn valid_actions(&self) -> &'static [SessionAction] {
        match self {
            SubtaskStatus::Todo => &[SessionAction::Start],
            SubtaskStatus::InProgress => &[SessionAction::Pause, SessionAction::Complete],
            SubtaskStatus::Paused => &[SessionAction::Resume, SessionAction::Complete],
            SubtaskStatus::Done => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SubtaskStatus::Done)
    }
}

impl fmt::Display for SubtaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubtaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(SubtaskStatus::Todo),
            "in_progress" => Ok(SubtaskStatus::InProgress),
            "paused" => Ok(SubtaskStatus::Paused),
            "done" => Ok(SubtaskStatus::Done),
            other => Err(format!("unknown subtask status: {other}")),
        }
    }
}

/// User-facing operation on a subtask's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionAction {
    Start,
    Pause,
    Resume,
    Complete,
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionAction::Start => write!(f, "start"),
            SessionAction::Pause => write!(f, "pause"),
            SessionAction::Resume => write!(f, "resume"),
            SessionAction::Complete => write!(f, "complete"),
        }
    }
}

/// One start→(pause/resume)*→end cycle recorded for a subtask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSession {
    pub id: String,
    pub subtask_id: String,
    pub started_at: DateTime<Utc>,
    pub paused_at: Option<DateTime<Utc>>,
    pub resumed_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Committed elapsed time as of the last pause/resume boundary.
    pub duration_seconds: u64,
}

impl TimeSession {
    /// Open a new session at `now` with nothing committed yet.
    pub fn open(subtask_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            subtask_id: subtask_id.into(),
            started_at: now,
            paused_at: None,
            resumed_at: None,
            ended_at: None,
            duration_seconds: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Timestamp live time is counted from: `resumed_at` wins over `started_at`.
    pub fn reference_time(&self) -> DateTime<Utc> {
        self.resumed_at.unwrap_or(self.started_at)
    }
}
