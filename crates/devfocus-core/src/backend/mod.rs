//! Backend command surface.
//!
//! Every window talks to persistence only through [`Backend`]. Calls are
//! asynchronous and fallible; callers must not assume success. The backend
//! is the single serialization point for subtask/session mutation and the
//! only place the session state machine is enforced.

mod local;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::error::BackendError;
use crate::profile::{CategoryExperience, CategoryStats, UserProfile};
use crate::session::TimeSession;
use crate::stats::{GeneralLedger, TaskLedger};
use crate::task::{
    Category, Subtask, Task, TaskStatus, TaskWithActiveSubtask, TaskWithSubtasksAndSessions,
};

pub use local::{Clock, LocalBackend};

/// Base points for completing a subtask.
pub const BASE_POINTS: u64 = 10;
/// Extra points for finishing under [`crate::stats::EFFICIENT_SESSION_SECONDS`].
pub const EFFICIENCY_BONUS_POINTS: u64 = 5;
/// Extra task points once a task has this many subtasks.
pub const COMPLEXITY_THRESHOLD: usize = 5;
pub const COMPLEXITY_BONUS_POINTS: u64 = 20;

/// Result of `completeSubtask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtaskCompletion {
    pub subtask: Subtask,
    pub points_earned: u64,
    pub time_spent_seconds: u64,
    pub xp_gained: u64,
    pub streak_bonus_percentage: u32,
    pub category: Option<Category>,
}

#[async_trait]
pub trait Backend: Send + Sync {
    async fn create_task(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<Task, BackendError>;

    /// Newest first, each with its first in-progress subtask.
    async fn list_tasks_with_active_subtasks(
        &self,
        status: Option<TaskStatus>,
    ) -> Result<Vec<TaskWithActiveSubtask>, BackendError>;

    async fn get_task_with_subtasks_and_sessions(
        &self,
        task_id: &str,
    ) -> Result<TaskWithSubtasksAndSessions, BackendError>;

    async fn update_task_status(
        &self,
        task_id: &str,
        status: TaskStatus,
    ) -> Result<Task, BackendError>;

    async fn delete_task(&self, task_id: &str) -> Result<(), BackendError>;

    async fn create_subtask(
        &self,
        task_id: &str,
        title: &str,
        category_id: Option<&str>,
    ) -> Result<Subtask, BackendError>;

    async fn delete_subtask(&self, subtask_id: &str) -> Result<(), BackendError>;

    async fn start_subtask(&self, subtask_id: &str) -> Result<TimeSession, BackendError>;

    async fn pause_subtask(
        &self,
        subtask_id: &str,
        duration_seconds: u64,
    ) -> Result<TimeSession, BackendError>;

    async fn resume_subtask(&self, subtask_id: &str) -> Result<TimeSession, BackendError>;

    async fn complete_subtask(
        &self,
        subtask_id: &str,
        duration_seconds: u64,
    ) -> Result<SubtaskCompletion, BackendError>;

    async fn get_subtask_with_session(
        &self,
        subtask_id: &str,
    ) -> Result<(Subtask, Option<TimeSession>), BackendError>;

    async fn get_task_metrics(&self, task_id: &str) -> Result<TaskLedger, BackendError>;

    async fn get_general_metrics(&self) -> Result<GeneralLedger, BackendError>;

    async fn create_category(&self, name: &str, color: &str) -> Result<Category, BackendError>;

    async fn list_categories(&self) -> Result<Vec<Category>, BackendError>;

    async fn delete_category(&self, category_id: &str) -> Result<(), BackendError>;

    async fn get_category_experience(
        &self,
        category_id: &str,
    ) -> Result<CategoryExperience, BackendError>;

    async fn get_all_category_stats(&self) -> Result<Vec<CategoryStats>, BackendError>;

    async fn get_user_profile(&self) -> Result<UserProfile, BackendError>;
}

/// Await a backend call, optionally bounded by a client-side timeout.
///
/// With `timeout = None` the call may hang indefinitely.
pub async fn with_timeout<T, F>(
    command: &'static str,
    timeout: Option<Duration>,
    call: F,
) -> Result<T, BackendError>
where
    F: Future<Output = Result<T, BackendError>>,
{
    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout {
                command,
                secs: limit.as_secs(),
            }),
        },
        None => call.await,
    };
    if let Err(e) = &result {
        tracing::warn!("{command} failed: {e}");
    }
    result
}
