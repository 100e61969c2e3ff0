//! Read-side metrics for DevFocus.
//!
//! Rollups consumed by the summary windows and the CLI: per-task time and
//! points, and the seven-day global points window.

mod general_metrics;
mod task_metrics;

pub use general_metrics::{best_day, last_seven_days, GeneralLedger, GeneralMetrics, WINDOW_DAYS};
pub use task_metrics::{SubtaskTime, TaskLedger, TaskMetrics, EFFICIENT_SESSION_SECONDS};
