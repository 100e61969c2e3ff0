//! Elapsed-time reconstruction.
//!
//! ```text
//! reference       = session.resumedAt ?? session.startedAt
//! live_elapsed    = status == in_progress ? max(0, floor((now - reference) / 1000)) : 0
//! displayed_total = subtask.totalTimeSeconds + session.durationSeconds + live_elapsed
//! ```
//!
//! Recomputed from timestamps on every full state refresh. A ticking counter
//! may only be submitted to `pause`/`complete` if it was seeded from this
//! formula moments earlier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{SubtaskStatus, TimeSession};
use crate::task::Subtask;

/// Wall-clock seconds since the last start/resume, counted only while in progress.
pub fn live_elapsed_seconds(
    status: SubtaskStatus,
    session: &TimeSession,
    now: DateTime<Utc>,
) -> u64 {
    if status != SubtaskStatus::InProgress {
        return 0;
    }
    let millis = (now - session.reference_time()).num_milliseconds().max(0);
    (millis / 1000) as u64
}

/// The "current total" shown by every window and submitted on pause/complete.
pub fn displayed_total(subtask: &Subtask, session: Option<&TimeSession>, now: DateTime<Utc>) -> u64 {
    ElapsedBreakdown::compute(subtask, session, now).total()
}

/// The three components of a displayed total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElapsedBreakdown {
    /// Finalized time from prior sessions.
    pub accumulated: u64,
    /// Committed duration of the open session.
    pub committed: u64,
    /// Live seconds since the reference timestamp.
    pub live: u64,
}

impl ElapsedBreakdown {
    pub fn compute(subtask: &Subtask, session: Option<&TimeSession>, now: DateTime<Utc>) -> Self {
        match session {
            Some(session) => Self {
                accumulated: subtask.total_time_seconds,
                committed: session.duration_seconds,
                live: live_elapsed_seconds(subtask.status, session, now),
            },
            None => Self {
                accumulated: subtask.total_time_seconds,
                committed: 0,
                live: 0,
            },
        }
    }

    pub fn total(&self) -> u64 {
        self.accumulated + self.committed + self.live
    }
}
