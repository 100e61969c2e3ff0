//! Floating tracker window controller.
//!
//! Shows one subtask's running timer. Its state is never authoritative:
//! every `tracker:load` replaces it wholesale and reseeds the
//! [`TimerEngine`]. Pause/resume/done go straight to the backend, after
//! which the main window is told via `tracker:updated` so it can refetch.

use serde::Serialize;
use std::sync::{Arc, Mutex};

use super::{lock, record, Freshness, ViewContext};
use crate::backend::{Backend, SubtaskCompletion};
use crate::error::{CoreError, ValidationError};
use crate::scoring;
use crate::session::TimeSession;
use crate::sync::{
    Bootstrap, SyncEvent, TrackerAction, TrackerLoad, TrackerUpdated, WindowHost, WindowLabel,
};
use crate::timer::{format_hms, Ticker, TickerHandle, TimerEngine};

/// Tracker-local display state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerWindowState {
    pub subtask_id: String,
    pub title: String,
    pub seconds: u64,
    pub paused: bool,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
}

impl TrackerWindowState {
    pub fn clock_face(&self) -> String {
        format_hms(self.seconds)
    }
}

impl From<TrackerLoad> for TrackerWindowState {
    fn from(load: TrackerLoad) -> Self {
        Self {
            subtask_id: load.subtask_id,
            title: load.title,
            seconds: load.seconds,
            paused: load.paused,
            category_name: load.category_name,
            category_color: load.category_color,
        }
    }
}

#[derive(Debug, Default)]
struct TrackerInner {
    view: Option<TrackerWindowState>,
    engine: TimerEngine,
    error: Option<String>,
    closed: bool,
}

pub struct TrackerWindow<B, H: WindowHost> {
    ctx: ViewContext<B, H>,
    inner: Mutex<TrackerInner>,
    fresh: Freshness,
}

impl<B: Backend, H: WindowHost> TrackerWindow<B, H> {
    pub fn new(ctx: ViewContext<B, H>) -> Self {
        Self {
            ctx,
            inner: Mutex::new(TrackerInner::default()),
            fresh: Freshness::new(),
        }
    }

    /// Build from the window's initial URL. Non-tracker URLs leave it empty.
    pub fn from_location(ctx: ViewContext<B, H>, location: &str) -> Self {
        let tracker = Self::new(ctx);
        if let Bootstrap::Tracker(load) = Bootstrap::parse(location) {
            tracker.load(load);
        }
        tracker
    }

    /// Current display state with the live counter folded in.
    pub fn snapshot(&self) -> Option<TrackerWindowState> {
        let inner = lock(&self.inner);
        inner.view.clone().map(|mut view| {
            view.seconds = inner.engine.seconds();
            view
        })
    }

    pub fn error(&self) -> Option<String> {
        lock(&self.inner).error.clone()
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.inner).closed
    }

    /// Replace everything with `load`. Any in-flight action result becomes stale.
    pub fn load(&self, load: TrackerLoad) {
        let mut inner = lock(&self.inner);
        self.fresh.bump();
        inner.engine.seed(load.seconds, !load.paused);
        inner.view = Some(load.into());
        inner.error = None;
        inner.closed = false;
    }

    /// One timer period elapsed. Returns the new count while running.
    pub fn tick(&self) -> Option<u64> {
        lock(&self.inner).engine.tick()
    }

    /// Drive [`Self::tick`] from a spawned [`Ticker`].
    pub fn spawn_ticker(self: &Arc<Self>, ticker: Ticker) -> TickerHandle
    where
        B: 'static,
        H: 'static,
    {
        let tracker = Arc::clone(self);
        ticker.spawn(move || {
            tracker.tick();
        })
    }

    /// XP this session would earn if completed now.
    pub fn preview_xp(&self, streak_bonus_percentage: u32) -> u64 {
        scoring::xp_for_session(lock(&self.inner).engine.seconds(), streak_bonus_percentage)
    }

    fn subject(&self) -> Result<(String, u64), CoreError> {
        let inner = lock(&self.inner);
        inner
            .view
            .as_ref()
            .map(|v| (v.subtask_id.clone(), inner.engine.seconds()))
            .ok_or_else(|| ValidationError::MissingId { field: "subtaskId" }.into())
    }

    fn fail<E: Into<CoreError>>(&self, err: E) -> CoreError {
        record(&mut lock(&self.inner).error, err)
    }

    pub async fn pause(&self) -> Result<TimeSession, CoreError> {
        let (subtask_id, seconds) = self.subject()?;
        let ticket = self.fresh.issue();
        let session = self
            .ctx
            .call(
                "pauseSubtask",
                self.ctx.backend.pause_subtask(&subtask_id, seconds),
            )
            .await
            .map_err(|e| self.fail(e))?;
        {
            let mut inner = lock(&self.inner);
            if self.fresh.accept(ticket) {
                inner.engine.seed(session.duration_seconds, false);
                if let Some(view) = inner.view.as_mut() {
                    view.paused = true;
                }
                inner.error = None;
            } else {
                tracing::debug!("tracker reloaded while pausing {subtask_id}");
            }
        }
        self.notify(TrackerAction::Pause, subtask_id);
        Ok(session)
    }

    pub async fn resume(&self) -> Result<TimeSession, CoreError> {
        let (subtask_id, _) = self.subject()?;
        let ticket = self.fresh.issue();
        let session = self
            .ctx
            .call("resumeSubtask", self.ctx.backend.resume_subtask(&subtask_id))
            .await
            .map_err(|e| self.fail(e))?;
        {
            let mut inner = lock(&self.inner);
            if self.fresh.accept(ticket) {
                inner.engine.run();
                if let Some(view) = inner.view.as_mut() {
                    view.paused = false;
                }
                inner.error = None;
            } else {
                tracing::debug!("tracker reloaded while resuming {subtask_id}");
            }
        }
        self.notify(TrackerAction::Resume, subtask_id);
        Ok(session)
    }

    /// Pause when running, resume when paused.
    pub async fn toggle(&self) -> Result<TimeSession, CoreError> {
        let paused = self.snapshot().is_some_and(|v| v.paused);
        if paused {
            self.resume().await
        } else {
            self.pause().await
        }
    }

    /// Complete the subtask with the displayed total and close the tracker.
    pub async fn done(&self) -> Result<SubtaskCompletion, CoreError> {
        let (subtask_id, seconds) = self.subject()?;
        let completion = self
            .ctx
            .call(
                "completeSubtask",
                self.ctx.backend.complete_subtask(&subtask_id, seconds),
            )
            .await
            .map_err(|e| self.fail(e))?;
        self.notify(TrackerAction::Done, subtask_id);
        self.close();
        Ok(completion)
    }

    pub fn close(&self) {
        {
            let mut inner = lock(&self.inner);
            inner.closed = true;
            inner.engine.freeze();
        }
        self.ctx.windows.close(WindowLabel::SubtaskTracker);
    }

    fn notify(&self, action: TrackerAction, subtask_id: String) {
        self.ctx
            .windows
            .emit(&SyncEvent::TrackerUpdated(TrackerUpdated { action, subtask_id }));
    }

    pub fn handle_event(&self, event: SyncEvent) {
        match event {
            SyncEvent::TrackerLoad(load) => self.load(load),
            SyncEvent::TrackerClose => self.close(),
            other => tracing::debug!("tracker ignoring {}", other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LocalBackend;
    use crate::sync::{MemoryWindowHost, WindowManager};

    fn tracker() -> (TrackerWindow<LocalBackend, MemoryWindowHost>, MemoryWindowHost) {
        let host = MemoryWindowHost::new();
        let windows = Arc::new(WindowManager::new(host.clone(), "http://localhost:1420"));
        let backend = Arc::new(LocalBackend::in_memory().unwrap());
        (TrackerWindow::new(ViewContext::new(backend, windows)), host)
    }

    fn seed(id: &str, seconds: u64, paused: bool) -> TrackerLoad {
        TrackerLoad {
            subtask_id: id.into(),
            title: "Write tests".into(),
            seconds,
            paused,
            category_name: None,
            category_color: None,
        }
    }

    #[test]
    fn load_replaces_state_and_reseeds() {
        let (t, _) = tracker();
        t.load(seed("a", 100, false));
        t.tick();
        t.tick();
        assert_eq!(t.snapshot().unwrap().seconds, 102);

        t.load(seed("b", 7, true));
        t.tick();
        let view = t.snapshot().unwrap();
        assert_eq!(view.subtask_id, "b");
        assert_eq!(view.seconds, 7);
        assert!(view.paused);
    }

    #[test]
    fn bootstrap_url_seeds_first_paint() {
        let host = MemoryWindowHost::new();
        let windows = Arc::new(WindowManager::new(host, "http://localhost:1420"));
        let backend = Arc::new(LocalBackend::in_memory().unwrap());
        let t = TrackerWindow::from_location(
            ViewContext::new(backend, windows),
            "index.html?view=subtask-tracker&subtaskId=s1&title=Fix&seconds=61&paused=0",
        );
        let view = t.snapshot().unwrap();
        assert_eq!(view.seconds, 61);
        assert_eq!(view.clock_face(), "00:01:01");
    }

    #[tokio::test]
    async fn actions_without_subject_are_rejected() {
        let (t, _) = tracker();
        assert!(matches!(
            t.pause().await,
            Err(CoreError::Validation(ValidationError::MissingId { .. }))
        ));
    }

    #[tokio::test]
    async fn failed_pause_keeps_ticking_state() {
        let (t, _) = tracker();
        t.load(seed("missing", 40, false));
        assert!(t.pause().await.is_err());
        assert!(t.error().is_some());
        let view = t.snapshot().unwrap();
        assert!(!view.paused);
        assert_eq!(t.tick(), Some(41));
    }

    #[test]
    fn close_event_closes_window() {
        let (t, host) = tracker();
        host.open_external(WindowLabel::SubtaskTracker);
        t.load(seed("a", 0, false));
        t.handle_event(SyncEvent::TrackerClose);
        assert!(t.is_closed());
        assert!(!host.is_live(WindowLabel::SubtaskTracker));
        assert_eq!(t.tick(), None);
    }

    #[test]
    fn preview_uses_streak_bonus() {
        let (t, _) = tracker();
        t.load(seed("a", 200, true));
        assert_eq!(t.preview_xp(10), 220);
    }
}
