//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use devfocus_core::backend::{Backend, LocalBackend, SubtaskCompletion};
use devfocus_core::error::BackendError;
use devfocus_core::profile::{CategoryExperience, CategoryStats, UserProfile};
use devfocus_core::stats::{GeneralLedger, TaskLedger};
use devfocus_core::sync::{MemoryWindowHost, WindowManager};
use devfocus_core::task::{
    Category, Subtask, Task, TaskStatus, TaskWithActiveSubtask, TaskWithSubtasksAndSessions,
};
use devfocus_core::views::ViewContext;
use devfocus_core::TimeSession;

pub const BASE_URL: &str = "http://localhost:1420";

/// [`LocalBackend`] with per-command artificial latency.
pub struct SlowBackend {
    inner: LocalBackend,
    delays: Mutex<HashMap<&'static str, Duration>>,
}

impl SlowBackend {
    pub fn new() -> Self {
        Self {
            inner: LocalBackend::in_memory().unwrap(),
            delays: Mutex::new(HashMap::new()),
        }
    }

    pub fn delay(&self, command: &'static str, by: Duration) {
        self.delays.lock().unwrap().insert(command, by);
    }

    pub fn clear(&self, command: &'static str) {
        self.delays.lock().unwrap().remove(command);
    }

    async fn wait(&self, command: &'static str) {
        let delay = self.delays.lock().unwrap().get(command).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl Backend for SlowBackend {
    async fn create_task(&self, title: &str, description: Option<&str>) -> Result<Task, BackendError> {
        self.wait("createTask").await;
        self.inner.create_task(title, description).await
    }

    async fn list_tasks_with_active_subtasks(
        &self,
        status: Option<TaskStatus>,
    ) -> Result<Vec<TaskWithActiveSubtask>, BackendError> {
        self.wait("listTasksWithActiveSubtasks").await;
        self.inner.list_tasks_with_active_subtasks(status).await
    }

    async fn get_task_with_subtasks_and_sessions(
        &self,
        task_id: &str,
    ) -> Result<TaskWithSubtasksAndSessions, BackendError> {
        self.wait("getTaskWithSubtasksAndSessions").await;
        self.inner.get_task_with_subtasks_and_sessions(task_id).await
    }

    async fn update_task_status(&self, task_id: &str, status: TaskStatus) -> Result<Task, BackendError> {
        self.wait("updateTaskStatus").await;
        self.inner.update_task_status(task_id, status).await
    }

    async fn delete_task(&self, task_id: &str) -> Result<(), BackendError> {
        self.wait("deleteTask").await;
        self.inner.delete_task(task_id).await
    }

    async fn create_subtask(
        &self,
        task_id: &str,
        title: &str,
        category_id: Option<&str>,
    ) -> Result<Subtask, BackendError> {
        self.wait("createSubtask").await;
        self.inner.create_subtask(task_id, title, category_id).await
    }

    async fn delete_subtask(&self, subtask_id: &str) -> Result<(), BackendError> {
        self.wait("deleteSubtask").await;
        self.inner.delete_subtask(subtask_id).await
    }

    async fn start_subtask(&self, subtask_id: &str) -> Result<TimeSession, BackendError> {
        self.wait("startSubtask").await;
        self.inner.start_subtask(subtask_id).await
    }

    async fn pause_subtask(&self, subtask_id: &str, seconds: u64) -> Result<TimeSession, BackendError> {
        self.wait("pauseSubtask").await;
        self.inner.pause_subtask(subtask_id, seconds).await
    }

    async fn resume_subtask(&self, subtask_id: &str) -> Result<TimeSession, BackendError> {
        self.wait("resumeSubtask").await;
        self.inner.resume_subtask(subtask_id).await
    }

    async fn complete_subtask(
        &self,
        subtask_id: &str,
        seconds: u64,
    ) -> Result<SubtaskCompletion, BackendError> {
        self.wait("completeSubtask").await;
        self.inner.complete_subtask(subtask_id, seconds).await
    }

    async fn get_subtask_with_session(
        &self,
        subtask_id: &str,
    ) -> Result<(Subtask, Option<TimeSession>), BackendError> {
        self.wait("getSubtaskWithSession").await;
        self.inner.get_subtask_with_session(subtask_id).await
    }

    async fn get_task_metrics(&self, task_id: &str) -> Result<TaskLedger, BackendError> {
        self.wait("getTaskMetrics").await;
        self.inner.get_task_metrics(task_id).await
    }

    async fn get_general_metrics(&self) -> Result<GeneralLedger, BackendError> {
        self.wait("getGeneralMetrics").await;
        self.inner.get_general_metrics().await
    }

    async fn create_category(&self, name: &str, color: &str) -> Result<Category, BackendError> {
        self.inner.create_category(name, color).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, BackendError> {
        self.inner.list_categories().await
    }

    async fn delete_category(&self, category_id: &str) -> Result<(), BackendError> {
        self.inner.delete_category(category_id).await
    }

    async fn get_category_experience(&self, category_id: &str) -> Result<CategoryExperience, BackendError> {
        self.inner.get_category_experience(category_id).await
    }

    async fn get_all_category_stats(&self) -> Result<Vec<CategoryStats>, BackendError> {
        self.inner.get_all_category_stats().await
    }

    async fn get_user_profile(&self) -> Result<UserProfile, BackendError> {
        self.wait("getUserProfile").await;
        self.inner.get_user_profile().await
    }
}

/// One backend shared by several "window processes", each with its own
/// [`WindowManager`] over a common in-memory host.
pub struct Desktop<B> {
    pub backend: Arc<B>,
    pub host: MemoryWindowHost,
}

impl<B: Backend> Desktop<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
            host: MemoryWindowHost::new(),
        }
    }

    /// Context for a new window process.
    pub fn context(&self) -> ViewContext<B, MemoryWindowHost> {
        let windows = Arc::new(WindowManager::new(self.host.clone(), BASE_URL));
        ViewContext::new(self.backend.clone(), windows)
    }
}

pub fn local_desktop() -> Desktop<LocalBackend> {
    Desktop::new(LocalBackend::in_memory().unwrap())
}
