//! Per-task rollup.
//!
//! Time figures are computed here from the subtask rows; points and the
//! efficiency rate come from the backend ledger and are passed through.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::SubtaskStatus;
use crate::task::{Subtask, Task};

/// Sessions shorter than this earn the efficiency bonus.
pub const EFFICIENT_SESSION_SECONDS: u64 = 1500;

/// Raw per-task data returned by `getTaskMetrics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskLedger {
    pub task: Task,
    pub subtasks: Vec<Subtask>,
    pub total_points: u64,
    pub efficiency_rate: f64,
}

/// One subtask row of the task summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtaskTime {
    pub subtask_id: String,
    pub title: String,
    pub status: SubtaskStatus,
    pub total_time_seconds: u64,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskMetrics {
    pub task_id: String,
    pub task_title: String,
    /// Sum over completed subtasks only.
    pub total_time_seconds: u64,
    pub total_points: u64,
    pub subtasks_completed: u32,
    pub subtasks_total: u32,
    /// `total_time_seconds / subtasks_completed`, 0 when nothing is completed.
    pub average_time_per_subtask: f64,
    pub efficiency_rate: f64,
    pub completed_at: Option<DateTime<Utc>>,
    pub subtasks_with_time: Vec<SubtaskTime>,
}

impl TaskMetrics {
    pub fn rollup(ledger: &TaskLedger) -> Self {
        let completed: Vec<&Subtask> = ledger.subtasks.iter().filter(|s| s.is_done()).collect();
        let total_time_seconds: u64 = completed.iter().map(|s| s.total_time_seconds).sum();
        let subtasks_completed = completed.len() as u32;
        let average_time_per_subtask = if subtasks_completed == 0 {
            0.0
        } else {
            total_time_seconds as f64 / f64::from(subtasks_completed)
        };

        Self {
            task_id: ledger.task.id.clone(),
            task_title: ledger.task.title.clone(),
            total_time_seconds,
            total_points: ledger.total_points,
            subtasks_completed,
            subtasks_total: ledger.subtasks.len() as u32,
            average_time_per_subtask,
            efficiency_rate: ledger.efficiency_rate,
            completed_at: ledger.task.completed_at,
            subtasks_with_time: ledger
                .subtasks
                .iter()
                .map(|s| SubtaskTime {
                    subtask_id: s.id.clone(),
                    title: s.title.clone(),
                    status: s.status,
                    total_time_seconds: s.total_time_seconds,
                    category_name: s.category.as_ref().map(|c| c.name.clone()),
                    category_color: s.category.as_ref().map(|c| c.color.clone()),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subtask(task: &Task, status: SubtaskStatus, secs: u64) -> Subtask {
        let mut s = Subtask::new(&task.id, format!("{status}-{secs}"));
        s.status = status;
        s.total_time_seconds = secs;
        s
    }

    #[test]
    fn sums_completed_subtasks_only() {
        let task = Task::new("Release", None);
        let ledger = TaskLedger {
            subtasks: vec![
                subtask(&task, SubtaskStatus::Done, 600),
                subtask(&task, SubtaskStatus::Done, 1800),
                subtask(&task, SubtaskStatus::Paused, 900),
                subtask(&task, SubtaskStatus::Todo, 0),
            ],
            task,
            total_points: 25,
            efficiency_rate: 50.0,
        };
        let metrics = TaskMetrics::rollup(&ledger);
        assert_eq!(metrics.total_time_seconds, 2400);
        assert_eq!(metrics.subtasks_completed, 2);
        assert_eq!(metrics.subtasks_total, 4);
        assert_eq!(metrics.average_time_per_subtask, 1200.0);
        assert_eq!(metrics.total_points, 25);
        assert_eq!(metrics.efficiency_rate, 50.0);
        assert_eq!(metrics.subtasks_with_time.len(), 4);
    }

    #[test]
    fn no_completed_subtasks_means_zero_average() {
        let task = Task::new("Fresh", None);
        let ledger = TaskLedger {
            subtasks: vec![subtask(&task, SubtaskStatus::InProgress, 300)],
            task,
            total_points: 0,
            efficiency_rate: 0.0,
        };
        let metrics = TaskMetrics::rollup(&ledger);
        assert_eq!(metrics.total_time_seconds, 0);
        assert_eq!(metrics.average_time_per_subtask, 0.0);
    }
}
