//! Summary window controllers.

use serde::Serialize;
use std::sync::Mutex;

use super::{lock, record, Freshness, ViewContext};
use crate::backend::Backend;
use crate::error::{CoreError, ValidationError};
use crate::profile::ProfileView;
use crate::stats::{GeneralMetrics, TaskMetrics};
use crate::sync::{Bootstrap, SyncEvent, TaskRef, WindowHost, WindowLabel};
use crate::task::{validate_id, TaskStatus};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummaryStore {
    pub task_id: Option<String>,
    pub metrics: Option<TaskMetrics>,
    pub error: Option<String>,
}

/// Per-task report opened when every subtask of a task is done.
pub struct TaskSummaryWindow<B, H: WindowHost> {
    ctx: ViewContext<B, H>,
    store: Mutex<TaskSummaryStore>,
    fresh: Freshness,
}

impl<B: Backend, H: WindowHost> TaskSummaryWindow<B, H> {
    pub fn new(ctx: ViewContext<B, H>) -> Self {
        Self {
            ctx,
            store: Mutex::new(TaskSummaryStore::default()),
            fresh: Freshness::new(),
        }
    }

    /// Take the subject from the window's initial URL.
    pub fn from_location(ctx: ViewContext<B, H>, location: &str) -> Self {
        let window = Self::new(ctx);
        if let Bootstrap::TaskSummary { task_id } = Bootstrap::parse(location) {
            if !task_id.is_empty() {
                lock(&window.store).task_id = Some(task_id);
            }
        }
        window
    }

    pub fn snapshot(&self) -> TaskSummaryStore {
        lock(&self.store).clone()
    }

    /// Fetch metrics for `task_id` and make it the subject. On failure the
    /// previous subject and metrics stay in place.
    pub async fn load(&self, task_id: &str) -> Result<(), CoreError> {
        validate_id("taskId", task_id)?;
        let ticket = self.fresh.issue();
        let result = self
            .ctx
            .call("getTaskMetrics", self.ctx.backend.get_task_metrics(task_id))
            .await;

        let mut store = lock(&self.store);
        match result {
            Ok(ledger) => {
                if self.fresh.accept(ticket) {
                    store.task_id = Some(task_id.to_string());
                    store.metrics = Some(TaskMetrics::rollup(&ledger));
                    store.error = None;
                } else {
                    tracing::debug!("dropping stale metrics for task {task_id}");
                }
                Ok(())
            }
            Err(e) => Err(record(&mut store.error, e)),
        }
    }

    /// Reload the current subject.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let task_id = self.subject()?;
        self.load(&task_id).await
    }

    fn subject(&self) -> Result<String, CoreError> {
        lock(&self.store)
            .task_id
            .clone()
            .ok_or_else(|| ValidationError::MissingId { field: "taskId" }.into())
    }

    pub async fn handle_event(&self, event: SyncEvent) -> Result<(), CoreError> {
        match event {
            SyncEvent::SummaryLoad(TaskRef { task_id }) => {
                self.load(&task_id).await?;
                self.ctx.windows.get_or_create(Bootstrap::TaskSummary { task_id });
                Ok(())
            }
            other => {
                tracing::debug!("task summary ignoring {}", other.name());
                Ok(())
            }
        }
    }

    /// Mark the task done, tell the main window and close.
    pub async fn finish(&self) -> Result<(), CoreError> {
        let task_id = self.subject()?;
        self.ctx
            .call(
                "updateTaskStatus",
                self.ctx.backend.update_task_status(&task_id, TaskStatus::Done),
            )
            .await
            .map_err(|e| record(&mut lock(&self.store).error, e))?;
        self.ctx
            .windows
            .emit(&SyncEvent::SummaryRefresh(TaskRef { task_id }));
        self.ctx.windows.close(WindowLabel::TaskSummary);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralSummaryStore {
    pub metrics: Option<GeneralMetrics>,
    pub profile: Option<ProfileView>,
    pub error: Option<String>,
}

/// Global report: seven-day points chart, category levels and profile badge.
pub struct GeneralSummaryWindow<B, H: WindowHost> {
    ctx: ViewContext<B, H>,
    store: Mutex<GeneralSummaryStore>,
    fresh: Freshness,
}

impl<B: Backend, H: WindowHost> GeneralSummaryWindow<B, H> {
    pub fn new(ctx: ViewContext<B, H>) -> Self {
        Self {
            ctx,
            store: Mutex::new(GeneralSummaryStore::default()),
            fresh: Freshness::new(),
        }
    }

    pub fn snapshot(&self) -> GeneralSummaryStore {
        lock(&self.store).clone()
    }

    pub async fn refresh(&self) -> Result<(), CoreError> {
        let ticket = self.fresh.issue();
        let ledger = self
            .ctx
            .call("getGeneralMetrics", self.ctx.backend.get_general_metrics())
            .await
            .map_err(|e| self.fail(e))?;
        let profile = self
            .ctx
            .call("getUserProfile", self.ctx.backend.get_user_profile())
            .await
            .map_err(|e| self.fail(e))?;

        let today = self.ctx.now().date_naive();
        let mut store = lock(&self.store);
        if self.fresh.accept(ticket) {
            store.metrics = Some(GeneralMetrics::rollup(&ledger, today));
            store.profile = Some(ProfileView::from_profile(&profile, today));
            store.error = None;
        }
        Ok(())
    }

    fn fail<E: Into<CoreError>>(&self, err: E) -> CoreError {
        record(&mut lock(&self.store).error, err)
    }

    pub fn close(&self) {
        self.ctx.windows.close(WindowLabel::GeneralSummary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LocalBackend;
    use crate::sync::{MemoryWindowHost, WindowManager};
    use std::sync::Arc;

    fn context() -> (ViewContext<LocalBackend, MemoryWindowHost>, MemoryWindowHost) {
        let host = MemoryWindowHost::new();
        let windows = Arc::new(WindowManager::new(host.clone(), "http://localhost:1420"));
        let backend = Arc::new(LocalBackend::in_memory().unwrap());
        (ViewContext::new(backend, windows), host)
    }

    #[tokio::test]
    async fn task_summary_loads_from_bootstrap() {
        let (ctx, _) = context();
        let backend = ctx.backend.clone();
        let task = backend.create_task("Ship", None).await.unwrap();
        let sub = backend.create_subtask(&task.id, "a", None).await.unwrap();
        backend.start_subtask(&sub.id).await.unwrap();
        backend.complete_subtask(&sub.id, 300).await.unwrap();

        let window = TaskSummaryWindow::from_location(
            ctx,
            &format!("index.html?view=task-summary&taskId={}", task.id),
        );
        window.refresh().await.unwrap();
        let metrics = window.snapshot().metrics.unwrap();
        assert_eq!(metrics.total_time_seconds, 300);
        assert_eq!(metrics.total_points, 15);
        assert_eq!(metrics.subtasks_completed, 1);
    }

    #[tokio::test]
    async fn finish_marks_done_and_notifies_main() {
        let (ctx, host) = context();
        host.open_external(WindowLabel::Main);
        host.open_external(WindowLabel::TaskSummary);
        let task = ctx.backend.create_task("Ship", None).await.unwrap();
        let window = TaskSummaryWindow::new(ctx.clone());
        window.load(&task.id).await.unwrap();
        window.finish().await.unwrap();

        let detail = ctx
            .backend
            .get_task_with_subtasks_and_sessions(&task.id)
            .await
            .unwrap();
        assert_eq!(detail.task.status, TaskStatus::Done);
        assert_eq!(
            host.emitted_to(WindowLabel::Main),
            vec![SyncEvent::SummaryRefresh(TaskRef { task_id: task.id })]
        );
        assert!(!host.is_live(WindowLabel::TaskSummary));
    }

    #[tokio::test]
    async fn missing_task_sets_error() {
        let (ctx, _) = context();
        let window = TaskSummaryWindow::new(ctx);
        assert!(window.load("nope").await.is_err());
        assert!(window.snapshot().error.is_some());
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_subject() {
        let (ctx, _) = context();
        let task = ctx.backend.create_task("Ship", None).await.unwrap();
        let window = TaskSummaryWindow::new(ctx);
        window.load(&task.id).await.unwrap();
        let before = window.snapshot().metrics;

        assert!(window.load("nope").await.is_err());
        let store = window.snapshot();
        assert_eq!(store.task_id.as_deref(), Some(task.id.as_str()));
        assert_eq!(store.metrics, before);
        assert!(store.error.is_some());
    }

    #[tokio::test]
    async fn general_summary_rolls_up_window() {
        let (ctx, _) = context();
        let window = GeneralSummaryWindow::new(ctx);
        window.refresh().await.unwrap();
        let store = window.snapshot();
        let metrics = store.metrics.unwrap();
        assert_eq!(metrics.points_last_7_days.len(), 7);
        assert!(metrics.best_day.is_none());
        assert_eq!(store.profile.unwrap().level, 1);
    }
}
