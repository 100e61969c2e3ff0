//! Subtask lifecycle commands.
//!
//! `pause` and `done` submit the total shown by the reconstruction formula
//! unless `--seconds` overrides it.

use clap::Subcommand;
use devfocus_core::timer::format_hms;
use devfocus_core::{displayed_total, Backend, LocalBackend};

use super::{backend, print_json, CliResult};

#[derive(Subcommand)]
pub enum SubtaskAction {
    /// Add a subtask to a task
    Add {
        /// Parent task ID
        task_id: String,
        /// Subtask title
        title: String,
        /// Category ID
        #[arg(long)]
        category: Option<String>,
    },
    /// Start tracking a subtask
    Start {
        /// Subtask ID
        id: String,
    },
    /// Pause a running subtask
    Pause {
        /// Subtask ID
        id: String,
        /// Total seconds to record instead of the elapsed clock
        #[arg(long)]
        seconds: Option<u64>,
    },
    /// Resume a paused subtask
    Resume {
        /// Subtask ID
        id: String,
    },
    /// Complete a subtask and collect points and XP
    Done {
        /// Subtask ID
        id: String,
        /// Total seconds to record instead of the elapsed clock
        #[arg(long)]
        seconds: Option<u64>,
    },
    /// Delete a subtask
    Delete {
        /// Subtask ID
        id: String,
    },
}

/// The total a window would display right now.
async fn observed_seconds(backend: &LocalBackend, id: &str) -> CliResult<u64> {
    let (subtask, session) = backend.get_subtask_with_session(id).await?;
    Ok(displayed_total(&subtask, session.as_ref(), chrono::Utc::now()))
}

pub async fn run(action: SubtaskAction, json: bool) -> CliResult {
    let backend = backend()?;

    match action {
        SubtaskAction::Add {
            task_id,
            title,
            category,
        } => {
            let subtask = backend
                .create_subtask(&task_id, &title, category.as_deref())
                .await?;
            if json {
                print_json(&subtask)?;
            } else {
                println!("Subtask created: {}", subtask.id);
            }
        }
        SubtaskAction::Start { id } => {
            let session = backend.start_subtask(&id).await?;
            if json {
                print_json(&session)?;
            } else {
                println!("Started {id}");
            }
        }
        SubtaskAction::Pause { id, seconds } => {
            let seconds = match seconds {
                Some(s) => s,
                None => observed_seconds(&backend, &id).await?,
            };
            let session = backend.pause_subtask(&id, seconds).await?;
            if json {
                print_json(&session)?;
            } else {
                println!("Paused {id} at {}", format_hms(session.duration_seconds));
            }
        }
        SubtaskAction::Resume { id } => {
            let session = backend.resume_subtask(&id).await?;
            if json {
                print_json(&session)?;
            } else {
                println!("Resumed {id}");
            }
        }
        SubtaskAction::Done { id, seconds } => {
            let seconds = match seconds {
                Some(s) => s,
                None => observed_seconds(&backend, &id).await?,
            };
            let completion = backend.complete_subtask(&id, seconds).await?;
            if json {
                print_json(&completion)?;
            } else {
                println!(
                    "Completed {} in {}: +{} points, +{} XP",
                    completion.subtask.title,
                    format_hms(completion.time_spent_seconds),
                    completion.points_earned,
                    completion.xp_gained
                );
                if completion.streak_bonus_percentage > 0 {
                    println!("  streak bonus {}%", completion.streak_bonus_percentage);
                }
            }
        }
        SubtaskAction::Delete { id } => {
            backend.delete_subtask(&id).await?;
            if json {
                print_json(&serde_json::json!({ "deleted": id }))?;
            } else {
                println!("Subtask deleted: {id}");
            }
        }
    }
    Ok(())
}
