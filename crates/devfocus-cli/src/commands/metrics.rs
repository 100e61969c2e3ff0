//! Metrics commands for CLI.

use clap::Subcommand;
use devfocus_core::timer::format_hms;
use devfocus_core::{Backend, GeneralMetrics, TaskMetrics};

use super::{backend, print_json, CliResult};

#[derive(Subcommand)]
pub enum MetricsAction {
    /// Time, points and efficiency for one task
    Task {
        /// Task ID
        id: String,
    },
    /// Totals, the last seven days and category levels
    General,
}

pub async fn run(action: MetricsAction, json: bool) -> CliResult {
    let backend = backend()?;

    match action {
        MetricsAction::Task { id } => {
            let metrics = TaskMetrics::rollup(&backend.get_task_metrics(&id).await?);
            if json {
                return print_json(&metrics);
            }
            println!("{}", metrics.task_title);
            println!("  Total time:   {}", format_hms(metrics.total_time_seconds));
            println!("  Points:       {}", metrics.total_points);
            println!(
                "  Subtasks:     {}/{}",
                metrics.subtasks_completed, metrics.subtasks_total
            );
            println!(
                "  Avg/subtask:  {}",
                format_hms(metrics.average_time_per_subtask.round() as u64)
            );
            println!("  Efficiency:   {:.0}%", metrics.efficiency_rate);
            for s in &metrics.subtasks_with_time {
                println!(
                    "    {} {} [{}]",
                    format_hms(s.total_time_seconds),
                    s.title,
                    s.status
                );
            }
        }
        MetricsAction::General => {
            let today = chrono::Utc::now().date_naive();
            let metrics = GeneralMetrics::rollup(&backend.get_general_metrics().await?, today);
            if json {
                return print_json(&metrics);
            }
            println!("Total points:      {}", metrics.total_points);
            println!("Total time:        {}", format_hms(metrics.total_time_seconds));
            println!("Tasks completed:   {}", metrics.tasks_completed);
            println!("Subtasks completed: {}", metrics.subtasks_completed);
            println!("\nLast 7 days:");
            for day in &metrics.points_last_7_days {
                println!("  {}  {:>4}  {}", day.date, day.points, bar(day.points));
            }
            if let Some(best) = &metrics.best_day {
                println!("Best day: {} ({} points)", best.date, best.points);
            }
            if !metrics.category_stats.is_empty() {
                println!("\nCategories:");
                for c in &metrics.category_stats {
                    println!(
                        "  {:<12} level {:>2}  {:>6} XP  {:.0}%",
                        c.name, c.level, c.total_xp, c.progress_percentage
                    );
                }
            }
        }
    }
    Ok(())
}

fn bar(points: u64) -> String {
    "#".repeat((points / 5).min(40) as usize)
}
