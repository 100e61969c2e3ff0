//! Subtask session state machine.
//!
//! Wraps a subtask and its open session and applies transitions together
//! with the timestamp bookkeeping each one requires. The backend is the only
//! place transitions are committed; clients use [`SubtaskStatus::after`] to
//! decide which buttons to offer.
//!
//! Submitted seconds are trusted as-is. A client that stalls mid-session and
//! resubmits a stale total is indistinguishable from a short session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{SessionAction, SubtaskStatus, TimeSession};
use crate::error::TransitionError;
use crate::task::Subtask;

/// Largest second count SQLite can store as an integer.
pub const MAX_TRACKED_SECONDS: u64 = i64::MAX as u64;

/// Subtask plus its open session, with transition history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStateMachine {
    pub subtask: Subtask,
    pub session: Option<TimeSession>,
    #[serde(default)]
    pub history: Vec<TransitionEntry>,
}

/// One applied transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEntry {
    pub from: SubtaskStatus,
    pub to: SubtaskStatus,
    pub action: SessionAction,
    pub at: DateTime<Utc>,
}

impl SessionStateMachine {
    pub fn new(subtask: Subtask, session: Option<TimeSession>) -> Self {
        Self {
            subtask,
            session,
            history: Vec::new(),
        }
    }

    pub fn status(&self) -> SubtaskStatus {
        self.subtask.status
    }

    pub fn can_apply(&self, action: SessionAction) -> bool {
        self.subtask.status.after(action).is_some()
    }

    /// `todo → in_progress`. Opens a session with nothing committed.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<&TimeSession, TransitionError> {
        let next = self.check(SessionAction::Start)?;
        let session = TimeSession::open(self.subtask.id.clone(), now);
        self.commit(SessionAction::Start, next, now);
        Ok(&*self.session.insert(session))
    }

    /// `in_progress → paused`. `observed_seconds` becomes the committed baseline.
    pub fn pause(
        &mut self,
        observed_seconds: u64,
        now: DateTime<Utc>,
    ) -> Result<&TimeSession, TransitionError> {
        let next = self.check(SessionAction::Pause)?;
        let session = self.open_session(SessionAction::Pause)?;
        session.paused_at = Some(now);
        session.duration_seconds = observed_seconds;
        self.commit(SessionAction::Pause, next, now);
        self.current()
    }

    /// `paused → in_progress`. Live time restarts from `now`; committed time is kept.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<&TimeSession, TransitionError> {
        let next = self.check(SessionAction::Resume)?;
        let session = self.open_session(SessionAction::Resume)?;
        session.resumed_at = Some(now);
        self.commit(SessionAction::Resume, next, now);
        self.current()
    }

    /// `in_progress | paused → done`. Closes the session and folds the
    /// submitted total into the subtask. Returns the closed session.
    pub fn complete(
        &mut self,
        observed_seconds: u64,
        now: DateTime<Utc>,
    ) -> Result<TimeSession, TransitionError> {
        let next = self.check(SessionAction::Complete)?;
        let session = self.open_session(SessionAction::Complete)?;
        session.ended_at = Some(now);
        session.duration_seconds = observed_seconds;
        let closed = session.clone();
        self.session = None;
        self.subtask.total_time_seconds = self
            .subtask
            .total_time_seconds
            .saturating_add(observed_seconds)
            .min(MAX_TRACKED_SECONDS);
        self.subtask.completed_at = Some(now);
        self.commit(SessionAction::Complete, next, now);
        Ok(closed)
    }

    fn check(&self, action: SessionAction) -> Result<SubtaskStatus, TransitionError> {
        self.subtask
            .status
            .after(action)
            .ok_or_else(|| self.rejection(action))
    }

    fn open_session(&mut self, action: SessionAction) -> Result<&mut TimeSession, TransitionError> {
        let rejection = self.rejection(action);
        self.session
            .as_mut()
            .filter(|s| s.is_open())
            .ok_or(rejection)
    }

    fn current(&self) -> Result<&TimeSession, TransitionError> {
        self.session
            .as_ref()
            .ok_or_else(|| self.rejection(SessionAction::Resume))
    }

    fn rejection(&self, action: SessionAction) -> TransitionError {
        TransitionError {
            subtask_id: self.subtask.id.clone(),
            from: self.subtask.status,
            action,
        }
    }

    fn commit(&mut self, action: SessionAction, next: SubtaskStatus, now: DateTime<Utc>) {
        self.history.push(TransitionEntry {
            from: self.subtask.status,
            to: next,
            action,
            at: now,
        });
        self.subtask.status = next;
        self.subtask.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::displayed_total;
    use chrono::Duration;

    fn machine() -> SessionStateMachine {
        SessionStateMachine::new(Subtask::new("task-1", "Refactor lexer"), None)
    }

    #[test]
    fn start_opens_session() {
        let mut m = machine();
        let t0 = Utc::now();
        let session = m.start(t0).unwrap();
        assert_eq!(session.started_at, t0);
        assert_eq!(session.duration_seconds, 0);
        assert!(session.is_open());
        assert_eq!(m.status(), SubtaskStatus::InProgress);
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut m = machine();
        m.start(Utc::now()).unwrap();
        let err = m.start(Utc::now()).unwrap_err();
        assert_eq!(err.from, SubtaskStatus::InProgress);
        assert_eq!(err.action, SessionAction::Start);
    }

    #[test]
    fn pause_commits_observed_seconds() {
        let mut m = machine();
        let t0 = Utc::now();
        m.start(t0).unwrap();
        let session = m.pause(45, t0 + Duration::seconds(45)).unwrap();
        assert_eq!(session.duration_seconds, 45);
        assert_eq!(session.paused_at, Some(t0 + Duration::seconds(45)));
        assert_eq!(m.status(), SubtaskStatus::Paused);
    }

    #[test]
    fn resume_keeps_committed_duration() {
        let mut m = machine();
        let t0 = Utc::now();
        m.start(t0).unwrap();
        m.pause(45, t0 + Duration::seconds(45)).unwrap();
        let resumed = t0 + Duration::seconds(100);
        let session = m.resume(resumed).unwrap();
        assert_eq!(session.duration_seconds, 45);
        assert_eq!(session.resumed_at, Some(resumed));
        assert_eq!(m.status(), SubtaskStatus::InProgress);
    }

    #[test]
    fn pause_resume_complete_with_negligible_gap_preserves_total() {
        let mut m = machine();
        let t0 = Utc::now();
        m.start(t0).unwrap();
        let pause_at = t0 + Duration::seconds(90);
        let observed = displayed_total(&m.subtask, m.session.as_ref(), pause_at);
        m.pause(observed, pause_at).unwrap();

        let resume_at = pause_at + Duration::seconds(300);
        m.resume(resume_at).unwrap();

        let complete_at = resume_at + Duration::milliseconds(200);
        let final_total = displayed_total(&m.subtask, m.session.as_ref(), complete_at);
        assert_eq!(final_total, observed);

        let closed = m.complete(final_total, complete_at).unwrap();
        assert_eq!(closed.duration_seconds, 90);
        assert_eq!(m.subtask.total_time_seconds, 90);
        assert!(m.session.is_none());
    }

    #[test]
    fn complete_from_paused_is_terminal() {
        let mut m = machine();
        let t0 = Utc::now();
        m.start(t0).unwrap();
        m.pause(10, t0).unwrap();
        m.complete(10, t0).unwrap();
        assert_eq!(m.status(), SubtaskStatus::Done);
        assert!(m.subtask.completed_at.is_some());

        assert!(m.pause(10, t0).is_err());
        assert!(m.resume(t0).is_err());
        assert!(m.complete(10, t0).is_err());
        assert!(m.start(t0).is_err());
    }

    #[test]
    fn stale_resubmission_is_accepted_verbatim() {
        // The backend trusts the caller: a stalled client submitting an old
        // total shortens the recorded session and nothing flags it.
        let mut m = machine();
        let t0 = Utc::now();
        m.start(t0).unwrap();
        let closed = m.complete(5, t0 + Duration::hours(2)).unwrap();
        assert_eq!(closed.duration_seconds, 5);
    }

    #[test]
    fn history_records_each_transition() {
        let mut m = machine();
        let t0 = Utc::now();
        m.start(t0).unwrap();
        m.pause(1, t0).unwrap();
        m.resume(t0).unwrap();
        m.complete(2, t0).unwrap();
        let actions: Vec<_> = m.history.iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![
                SessionAction::Start,
                SessionAction::Pause,
                SessionAction::Resume,
                SessionAction::Complete
            ]
        );
        assert_eq!(m.history.last().unwrap().to, SubtaskStatus::Done);
    }
}
