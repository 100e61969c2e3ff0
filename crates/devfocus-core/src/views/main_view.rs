//! Main window controller.
//!
//! Owns the task list, the task being viewed, its active subtask and the
//! profile badge. Subtask actions go to the backend first; the authoritative
//! result is refetched and then pushed to the tracker window as
//! `tracker:load`. Inbound `tracker:updated` and `summary:refresh` events
//! only trigger refetches.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Mutex;

use super::{lock, record, Freshness, Ticket, ViewContext};
use crate::backend::{Backend, SubtaskCompletion};
use crate::error::{BackendError, CoreError, ValidationError};
use crate::profile::ProfileView;
use crate::session::{displayed_total, SubtaskStatus, TimeSession};
use crate::sync::{
    Bootstrap, Presentation, SyncEvent, TaskRef, TrackerAction, TrackerLoad, TrackerUpdated,
    WindowHost, WindowLabel,
};
use crate::task::{
    validate_id, validate_title, Subtask, SubtaskWithSession, Task, TaskWithActiveSubtask,
    TaskWithSubtasksAndSessions,
};

/// Subtask currently being timed, with its open session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSession {
    pub subtask: Subtask,
    pub session: TimeSession,
}

impl ActiveSession {
    fn from_entry(entry: &SubtaskWithSession) -> Option<Self> {
        entry.session.clone().map(|session| Self {
            subtask: entry.subtask.clone(),
            session,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MainStore {
    pub tasks: Vec<TaskWithActiveSubtask>,
    /// Detail view subject; `None` shows the list.
    pub current_task: Option<TaskWithSubtasksAndSessions>,
    pub active: Option<ActiveSession>,
    pub profile: Option<ProfileView>,
    pub error: Option<String>,
    /// Tasks whose summary window has already been opened.
    #[serde(skip)]
    pub summarized: HashSet<String>,
}

impl MainStore {
    pub fn current_task_id(&self) -> Option<&str> {
        self.current_task.as_ref().map(|t| t.task.id.as_str())
    }

    /// Task that owns `subtask_id`, looking at the detail view first and
    /// then at the list's active subtasks.
    fn owning_task(&self, subtask_id: &str) -> Option<String> {
        if let Some(current) = &self.current_task {
            if current.find_subtask(subtask_id).is_some() {
                return Some(current.task.id.clone());
            }
        }
        self.tasks
            .iter()
            .find(|t| {
                t.active_subtask
                    .as_ref()
                    .is_some_and(|a| a.id == subtask_id)
            })
            .map(|t| t.task.id.clone())
    }
}

pub struct MainWindow<B, H: WindowHost> {
    ctx: ViewContext<B, H>,
    store: Mutex<MainStore>,
    list: Freshness,
    task: Freshness,
    profile: Freshness,
}

impl<B: Backend, H: WindowHost> MainWindow<B, H> {
    pub fn new(ctx: ViewContext<B, H>) -> Self {
        Self {
            ctx,
            store: Mutex::new(MainStore::default()),
            list: Freshness::new(),
            task: Freshness::new(),
            profile: Freshness::new(),
        }
    }

    pub fn context(&self) -> &ViewContext<B, H> {
        &self.ctx
    }

    pub fn snapshot(&self) -> MainStore {
        lock(&self.store).clone()
    }

    // ── Refetches ────────────────────────────────────────────────────

    /// Reload the list and the profile.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        self.refresh_tasks().await?;
        self.refresh_profile().await
    }

    pub async fn refresh_tasks(&self) -> Result<(), CoreError> {
        let ticket = self.list.issue();
        let result = self
            .ctx
            .call(
                "listTasksWithActiveSubtasks",
                self.ctx.backend.list_tasks_with_active_subtasks(None),
            )
            .await;
        self.apply(&self.list, ticket, result, |store, tasks| store.tasks = tasks)
    }

    pub async fn refresh_profile(&self) -> Result<(), CoreError> {
        let ticket = self.profile.issue();
        let result = self
            .ctx
            .call("getUserProfile", self.ctx.backend.get_user_profile())
            .await;
        let today = self.ctx.now().date_naive();
        self.apply(&self.profile, ticket, result, |store, profile| {
            store.profile = Some(ProfileView::from_profile(&profile, today));
        })
    }

    /// Fetch `task_id` and, if `ticket` is still the newest, make it the
    /// detail view. The fetched detail is returned either way.
    async fn load_task(
        &self,
        task_id: &str,
        ticket: Ticket,
    ) -> Result<TaskWithSubtasksAndSessions, CoreError> {
        let detail = self.fetch_task(task_id).await?;
        let mut store = lock(&self.store);
        if self.task.accept(ticket) {
            store.active = detail.active_subtask().and_then(ActiveSession::from_entry);
            store.current_task = Some(detail.clone());
            store.error = None;
        } else {
            tracing::debug!("dropping stale detail for task {task_id}");
        }
        Ok(detail)
    }

    async fn fetch_task(&self, task_id: &str) -> Result<TaskWithSubtasksAndSessions, CoreError> {
        let result = self
            .ctx
            .call(
                "getTaskWithSubtasksAndSessions",
                self.ctx.backend.get_task_with_subtasks_and_sessions(task_id),
            )
            .await;
        result.map_err(|e| self.fail(e))
    }

    async fn reload_current(&self) -> Result<Option<TaskWithSubtasksAndSessions>, CoreError> {
        let Some(task_id) = self.snapshot().current_task_id().map(str::to_string) else {
            return Ok(None);
        };
        let ticket = self.task.issue();
        self.load_task(&task_id, ticket).await.map(Some)
    }

    fn apply<T>(
        &self,
        slice: &Freshness,
        ticket: Ticket,
        result: Result<T, BackendError>,
        write: impl FnOnce(&mut MainStore, T),
    ) -> Result<(), CoreError> {
        let mut store = lock(&self.store);
        match result {
            Ok(value) => {
                if slice.accept(ticket) {
                    write(&mut store, value);
                    store.error = None;
                } else {
                    tracing::debug!("dropping stale result");
                }
                Ok(())
            }
            Err(e) => Err(record(&mut store.error, e)),
        }
    }

    fn fail<E: Into<CoreError>>(&self, err: E) -> CoreError {
        record(&mut lock(&self.store).error, err)
    }

    fn require_task(&self) -> Result<String, CoreError> {
        self.snapshot()
            .current_task_id()
            .map(str::to_string)
            .ok_or_else(|| ValidationError::MissingId { field: "taskId" }.into())
    }

    // ── Task actions ─────────────────────────────────────────────────

    pub async fn create_task(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<Task, CoreError> {
        validate_title("title", title)?;
        let task = self
            .ctx
            .call("createTask", self.ctx.backend.create_task(title, description))
            .await
            .map_err(|e| self.fail(e))?;
        self.refresh_tasks().await?;
        Ok(task)
    }

    pub async fn delete_task(&self, task_id: &str) -> Result<(), CoreError> {
        validate_id("taskId", task_id)?;
        self.ctx
            .call("deleteTask", self.ctx.backend.delete_task(task_id))
            .await
            .map_err(|e| self.fail(e))?;

        let was_current = {
            let mut store = lock(&self.store);
            let was_current = store.current_task_id() == Some(task_id);
            if was_current {
                self.task.bump();
                store.current_task = None;
                store.active = None;
            }
            store.summarized.remove(task_id);
            was_current
        };
        if was_current {
            self.close_tracker();
        }
        self.refresh_tasks().await
    }

    /// Enter the detail view for `task_id`.
    /// Enter the detail view for `task_id`. A subtask already being timed
    /// is handed back to the tracker window.
    pub async fn open_task(&self, task_id: &str) -> Result<(), CoreError> {
        validate_id("taskId", task_id)?;
        let ticket = self.task.issue();
        let detail = self.load_task(task_id, ticket).await?;
        if self.snapshot().current_task_id() == Some(task_id) {
            if let Some(entry) = detail.active_subtask() {
                self.push_tracker(entry);
            }
        }
        Ok(())
    }

    /// Leave the detail view and close the tracker. In-flight detail loads
    /// are discarded.
    pub async fn back(&self) -> Result<(), CoreError> {
        {
            let mut store = lock(&self.store);
            self.task.bump();
            store.current_task = None;
            store.active = None;
        }
        self.close_tracker();
        self.refresh_tasks().await
    }

    pub fn open_general_summary(&self) -> Presentation {
        self.ctx.windows.get_or_create(Bootstrap::GeneralSummary)
    }

    // ── Subtask actions ──────────────────────────────────────────────

    pub async fn create_subtask(
        &self,
        title: &str,
        category_id: Option<&str>,
    ) -> Result<Subtask, CoreError> {
        let task_id = self.require_task()?;
        validate_title("title", title)?;
        let subtask = self
            .ctx
            .call(
                "createSubtask",
                self.ctx.backend.create_subtask(&task_id, title, category_id),
            )
            .await
            .map_err(|e| self.fail(e))?;
        self.reload_current().await?;
        Ok(subtask)
    }

    pub async fn delete_subtask(&self, subtask_id: &str) -> Result<(), CoreError> {
        validate_id("subtaskId", subtask_id)?;
        self.ctx
            .call("deleteSubtask", self.ctx.backend.delete_subtask(subtask_id))
            .await
            .map_err(|e| self.fail(e))?;
        let was_active = self
            .snapshot()
            .active
            .is_some_and(|a| a.subtask.id == subtask_id);
        if was_active {
            lock(&self.store).active = None;
            self.close_tracker();
        }
        self.reload_current().await?;
        self.refresh_tasks().await
    }

    pub async fn start_subtask(&self, subtask_id: &str) -> Result<TimeSession, CoreError> {
        validate_id("subtaskId", subtask_id)?;
        let session = self
            .ctx
            .call("startSubtask", self.ctx.backend.start_subtask(subtask_id))
            .await
            .map_err(|e| self.fail(e))?;
        self.after_transition(subtask_id).await?;
        Ok(session)
    }

    pub async fn pause_subtask(&self, subtask_id: &str) -> Result<TimeSession, CoreError> {
        let observed = self.observed_seconds(subtask_id).await?;
        let session = self
            .ctx
            .call(
                "pauseSubtask",
                self.ctx.backend.pause_subtask(subtask_id, observed),
            )
            .await
            .map_err(|e| self.fail(e))?;
        self.after_transition(subtask_id).await?;
        Ok(session)
    }

    pub async fn resume_subtask(&self, subtask_id: &str) -> Result<TimeSession, CoreError> {
        validate_id("subtaskId", subtask_id)?;
        let session = self
            .ctx
            .call("resumeSubtask", self.ctx.backend.resume_subtask(subtask_id))
            .await
            .map_err(|e| self.fail(e))?;
        self.after_transition(subtask_id).await?;
        Ok(session)
    }

    pub async fn complete_subtask(&self, subtask_id: &str) -> Result<SubtaskCompletion, CoreError> {
        let observed = self.observed_seconds(subtask_id).await?;
        let completion = self
            .ctx
            .call(
                "completeSubtask",
                self.ctx.backend.complete_subtask(subtask_id, observed),
            )
            .await
            .map_err(|e| self.fail(e))?;

        self.clear_active(subtask_id);
        self.close_tracker();
        let task_id = completion.subtask.task_id.clone();
        self.after_done(&task_id).await?;
        Ok(completion)
    }

    /// Authoritative current total for `subtask_id`, rebuilt from timestamps.
    async fn observed_seconds(&self, subtask_id: &str) -> Result<u64, CoreError> {
        validate_id("subtaskId", subtask_id)?;
        let (subtask, session) = self
            .ctx
            .call(
                "getSubtaskWithSession",
                self.ctx.backend.get_subtask_with_session(subtask_id),
            )
            .await
            .map_err(|e| self.fail(e))?;
        Ok(displayed_total(&subtask, session.as_ref(), self.ctx.now()))
    }

    /// Refetch after start/pause/resume and reseed the tracker.
    async fn after_transition(&self, subtask_id: &str) -> Result<(), CoreError> {
        if let Some(detail) = self.reload_current().await? {
            if let Some(entry) = detail.find_subtask(subtask_id) {
                self.push_tracker(entry);
            }
        }
        self.refresh_tasks().await
    }

    /// Refetch after a completion and open the summary once the task is finished.
    async fn after_done(&self, task_id: &str) -> Result<(), CoreError> {
        let showing = self.snapshot().current_task_id() == Some(task_id);
        let detail = if showing {
            let ticket = self.task.issue();
            self.load_task(task_id, ticket).await?
        } else {
            self.fetch_task(task_id).await?
        };
        self.maybe_open_summary(&detail);
        self.refresh_tasks().await?;
        self.refresh_profile().await
    }

    // ── Window sync ──────────────────────────────────────────────────

    /// Send the tracker a fresh display seed, opening it if needed.
    fn push_tracker(&self, entry: &SubtaskWithSession) {
        let subtask = &entry.subtask;
        if !matches!(
            subtask.status,
            SubtaskStatus::InProgress | SubtaskStatus::Paused
        ) {
            return;
        }
        let load = TrackerLoad {
            subtask_id: subtask.id.clone(),
            title: subtask.title.clone(),
            seconds: displayed_total(subtask, entry.session.as_ref(), self.ctx.now()),
            paused: subtask.status == SubtaskStatus::Paused,
            category_name: subtask.category.as_ref().map(|c| c.name.clone()),
            category_color: subtask.category.as_ref().map(|c| c.color.clone()),
        };
        let windows = &self.ctx.windows;
        if windows.is_open(WindowLabel::SubtaskTracker) {
            windows.emit(&SyncEvent::TrackerLoad(load));
        } else {
            windows.get_or_create(Bootstrap::Tracker(load));
        }
    }

    fn close_tracker(&self) {
        let windows = &self.ctx.windows;
        windows.emit(&SyncEvent::TrackerClose);
        windows.close(WindowLabel::SubtaskTracker);
    }

    fn clear_active(&self, subtask_id: &str) {
        let mut store = lock(&self.store);
        if store
            .active
            .as_ref()
            .is_some_and(|a| a.subtask.id == subtask_id)
        {
            store.active = None;
        }
    }

    /// Open the task summary the first time every subtask is done.
    /// Returns whether a summary was presented.
    fn maybe_open_summary(&self, detail: &TaskWithSubtasksAndSessions) -> bool {
        if !detail.all_subtasks_done() {
            return false;
        }
        let task_id = detail.task.id.clone();
        if !lock(&self.store).summarized.insert(task_id.clone()) {
            tracing::debug!("summary for task {task_id} already shown");
            return false;
        }
        let windows = &self.ctx.windows;
        let presentation = windows.get_or_create(Bootstrap::TaskSummary {
            task_id: task_id.clone(),
        });
        if presentation == Presentation::Focused {
            windows.emit(&SyncEvent::SummaryLoad(TaskRef { task_id }));
        }
        true
    }

    /// Dispatch an inbound sync event. Events for other windows are ignored.
    pub async fn handle_event(&self, event: SyncEvent) -> Result<(), CoreError> {
        match event {
            SyncEvent::TrackerUpdated(update) => self.on_tracker_updated(update).await,
            SyncEvent::SummaryRefresh(task) => self.on_summary_refresh(task).await,
            other => {
                tracing::debug!("main window ignoring {}", other.name());
                Ok(())
            }
        }
    }

    async fn on_tracker_updated(&self, update: TrackerUpdated) -> Result<(), CoreError> {
        let ticket = self.task.issue();
        let snapshot = self.snapshot();
        let task_id = match snapshot.owning_task(&update.subtask_id) {
            Some(task_id) => task_id,
            None => match self.lookup_owner(&update.subtask_id).await? {
                Some(task_id) => task_id,
                None => {
                    tracing::debug!(
                        "ignoring tracker {} for unknown subtask {}",
                        update.action,
                        update.subtask_id
                    );
                    return Ok(());
                }
            },
        };
        let showing = snapshot.current_task_id() == Some(task_id.as_str());

        if update.action == TrackerAction::Done {
            self.clear_active(&update.subtask_id);
            self.close_tracker();
        }

        let detail = if showing {
            self.load_task(&task_id, ticket).await?
        } else {
            self.fetch_task(&task_id).await?
        };

        if update.action == TrackerAction::Done {
            self.maybe_open_summary(&detail);
            self.refresh_profile().await?;
        }
        self.refresh_tasks().await
    }

    /// Ask the backend which task owns a subtask the store cannot place.
    /// `None` when the subtask no longer exists.
    async fn lookup_owner(&self, subtask_id: &str) -> Result<Option<String>, CoreError> {
        let result = self
            .ctx
            .call(
                "getSubtaskWithSession",
                self.ctx.backend.get_subtask_with_session(subtask_id),
            )
            .await;
        match result {
            Ok((subtask, _)) => Ok(Some(subtask.task_id)),
            Err(BackendError::NotFound { .. }) => Ok(None),
            Err(e) => Err(self.fail(e)),
        }
    }

    async fn on_summary_refresh(&self, task: TaskRef) -> Result<(), CoreError> {
        let current = self.snapshot().current_task_id().map(str::to_string);
        if current.as_deref().is_some_and(|id| id != task.task_id) {
            tracing::debug!("ignoring summary refresh for task {}", task.task_id);
            return Ok(());
        }
        self.back().await?;
        self.refresh_profile().await
    }
}
