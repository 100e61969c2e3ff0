//! Task, subtask and category types.
//!
//! A [`Task`] owns an ordered list of [`Subtask`]s (creation order). Subtasks
//! carry their own session lifecycle (see [`crate::session`]) and may
//! reference a [`Category`]. Every type serializes camelCase, matching the
//! payloads the desktop windows exchange.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::session::{SubtaskStatus, TimeSession};

/// Task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(format!("unknown task status: {other}")),
        }
    }
}

/// A unit of work made of subtasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description,
            status: TaskStatus::Todo,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Set the status; `done` stamps `completed_at`, anything else clears it.
    pub fn set_status(&mut self, status: TaskStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
        self.completed_at = (status == TaskStatus::Done).then_some(now);
    }
}

/// Smallest trackable unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: String,
    pub task_id: String,
    pub title: String,
    pub status: SubtaskStatus,
    pub category_id: Option<String>,
    /// Joined category row, filled by reads that need it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Finalized time from all sessions before the current one.
    pub total_time_seconds: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Subtask {
    pub fn new(task_id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            task_id: task_id.into(),
            title: title.into(),
            status: SubtaskStatus::Todo,
            category_id: None,
            category: None,
            total_time_seconds: 0,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Label a subtask may reference. Never owned by the subtask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Display color, `#rrggbb`.
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            color: color.into(),
            created_at: Utc::now(),
        }
    }
}

/// Subtask plus its open session, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtaskWithSession {
    #[serde(flatten)]
    pub subtask: Subtask,
    pub session: Option<TimeSession>,
}

/// Result of `getTaskWithSubtasksAndSessions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskWithSubtasksAndSessions {
    #[serde(flatten)]
    pub task: Task,
    pub subtasks: Vec<SubtaskWithSession>,
}

impl TaskWithSubtasksAndSessions {
    /// True when the task has subtasks and every one of them is done.
    pub fn all_subtasks_done(&self) -> bool {
        !self.subtasks.is_empty() && self.subtasks.iter().all(|s| s.subtask.is_done())
    }

    pub fn find_subtask(&self, subtask_id: &str) -> Option<&SubtaskWithSession> {
        self.subtasks.iter().find(|s| s.subtask.id == subtask_id)
    }

    /// First subtask currently in progress or paused.
    pub fn active_subtask(&self) -> Option<&SubtaskWithSession> {
        self.subtasks.iter().find(|s| {
            matches!(
                s.subtask.status,
                SubtaskStatus::InProgress | SubtaskStatus::Paused
            )
        })
    }
}

/// Summary of the in-progress subtask shown in the task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSubtaskInfo {
    pub id: String,
    pub title: String,
    pub total_time_seconds: u64,
    /// Reconstructed current total at the time of the listing.
    pub current_session_time: u64,
}

/// Row of `listTasksWithActiveSubtasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskWithActiveSubtask {
    #[serde(flatten)]
    pub task: Task,
    pub subtask_count: u32,
    pub completed_subtask_count: u32,
    pub active_subtask: Option<ActiveSubtaskInfo>,
}

/// Trim `value` and reject it if nothing is left.
pub fn validate_title(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle { field });
    }
    Ok(trimmed.to_string())
}

/// Reject blank identifiers before they reach the backend.
pub fn validate_id(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingId { field });
    }
    Ok(())
}

/// Accept `#rrggbb` only, normalized to lowercase.
pub fn validate_color(value: &str) -> Result<String, ValidationError> {
    let hex = value.strip_prefix('#').unwrap_or("");
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(format!("#{}", hex.to_ascii_lowercase()))
    } else {
        Err(ValidationError::InvalidColor(value.to_string()))
    }
}
