//! Task management commands for CLI.

use clap::Subcommand;
use devfocus_core::timer::format_hms;
use devfocus_core::{Backend, TaskStatus};

use super::{backend, print_json, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Create {
        /// Task title
        title: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
    },
    /// List tasks, newest first
    List {
        /// Filter by status (todo, in_progress, done)
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Show a task with its subtasks and open sessions
    Show {
        /// Task ID
        id: String,
    },
    /// Change a task's status
    Status {
        /// Task ID
        id: String,
        /// New status (todo, in_progress, done)
        status: TaskStatus,
    },
    /// Delete a task and its subtasks
    Delete {
        /// Task ID
        id: String,
    },
}

pub async fn run(action: TaskAction, json: bool) -> CliResult {
    let backend = backend()?;

    match action {
        TaskAction::Create { title, description } => {
            let task = backend.create_task(&title, description.as_deref()).await?;
            if json {
                print_json(&task)?;
            } else {
                println!("Task created: {}", task.id);
            }
        }
        TaskAction::List { status } => {
            let tasks = backend.list_tasks_with_active_subtasks(status).await?;
            if json {
                return print_json(&tasks);
            }
            if tasks.is_empty() {
                println!("No tasks.");
            }
            for entry in tasks {
                println!(
                    "{}  [{}] {} ({}/{})",
                    entry.task.id,
                    entry.task.status,
                    entry.task.title,
                    entry.completed_subtask_count,
                    entry.subtask_count
                );
                if let Some(active) = entry.active_subtask {
                    println!(
                        "    > {} {}",
                        active.title,
                        format_hms(active.current_session_time)
                    );
                }
            }
        }
        TaskAction::Show { id } => {
            let detail = backend.get_task_with_subtasks_and_sessions(&id).await?;
            if json {
                return print_json(&detail);
            }
            println!("{} [{}]", detail.task.title, detail.task.status);
            if let Some(description) = &detail.task.description {
                println!("  {description}");
            }
            let now = chrono::Utc::now();
            for entry in &detail.subtasks {
                let s = &entry.subtask;
                let category = s
                    .category
                    .as_ref()
                    .map(|c| format!(" #{}", c.name))
                    .unwrap_or_default();
                println!(
                    "  {}  {:<11} {} {}{}",
                    s.id,
                    s.status.to_string(),
                    format_hms(devfocus_core::displayed_total(s, entry.session.as_ref(), now)),
                    s.title,
                    category
                );
            }
        }
        TaskAction::Status { id, status } => {
            let task = backend.update_task_status(&id, status).await?;
            if json {
                print_json(&task)?;
            } else {
                println!("Task {} is now {}", task.id, task.status);
            }
        }
        TaskAction::Delete { id } => {
            backend.delete_task(&id).await?;
            if json {
                print_json(&serde_json::json!({ "deleted": id }))?;
            } else {
                println!("Task deleted: {id}");
            }
        }
    }
    Ok(())
}
