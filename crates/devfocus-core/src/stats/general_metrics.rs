//! Global rollup over the points ledger.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::profile::CategoryStats;
use crate::storage::DailyPoints;

/// Days covered by the points chart.
pub const WINDOW_DAYS: i64 = 7;

/// Raw global data returned by `getGeneralMetrics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralLedger {
    pub total_points: u64,
    pub total_time_seconds: u64,
    pub tasks_completed: u64,
    pub subtasks_completed: u64,
    /// Sparse per-day points; days without entries may be absent.
    pub daily_points: Vec<DailyPoints>,
    #[serde(default)]
    pub category_stats: Vec<CategoryStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralMetrics {
    pub total_points: u64,
    pub total_time_seconds: u64,
    pub tasks_completed: u64,
    pub subtasks_completed: u64,
    pub average_completion_seconds: f64,
    /// Seven contiguous UTC days ending today, oldest first, zero-filled.
    pub points_last_7_days: Vec<DailyPoints>,
    /// Highest-scoring day in the window; earliest wins ties. `None` if all zero.
    pub best_day: Option<DailyPoints>,
    pub category_stats: Vec<CategoryStats>,
}

impl GeneralMetrics {
    pub fn rollup(ledger: &GeneralLedger, today: NaiveDate) -> Self {
        let points_last_7_days = last_seven_days(&ledger.daily_points, today);
        let best_day = best_day(&points_last_7_days);
        let average_completion_seconds = if ledger.subtasks_completed == 0 {
            0.0
        } else {
            ledger.total_time_seconds as f64 / ledger.subtasks_completed as f64
        };
        Self {
            total_points: ledger.total_points,
            total_time_seconds: ledger.total_time_seconds,
            tasks_completed: ledger.tasks_completed,
            subtasks_completed: ledger.subtasks_completed,
            average_completion_seconds,
            points_last_7_days,
            best_day,
            category_stats: ledger.category_stats.clone(),
        }
    }
}

/// Zero-filled window of [`WINDOW_DAYS`] days ending at `today`, oldest first.
/// Entries outside the window are ignored; duplicate days are summed.
pub fn last_seven_days(daily: &[DailyPoints], today: NaiveDate) -> Vec<DailyPoints> {
    (0..WINDOW_DAYS)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            let points = daily
                .iter()
                .filter(|d| d.date == date)
                .map(|d| d.points)
                .sum();
            DailyPoints { date, points }
        })
        .collect()
}

/// First day with the maximum points, or `None` if every day is zero.
pub fn best_day(days: &[DailyPoints]) -> Option<DailyPoints> {
    days.iter()
        .filter(|d| d.points > 0)
        .fold(None::<&DailyPoints>, |best, d| match best {
            Some(b) if b.points >= d.points => Some(b),
            _ => Some(d),
        })
        .cloned()
}
