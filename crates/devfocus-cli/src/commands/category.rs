//! Category management commands for CLI.

use clap::Subcommand;
use devfocus_core::Backend;

use super::{backend, print_json, CliResult};

#[derive(Subcommand)]
pub enum CategoryAction {
    /// Create a category
    Add {
        /// Category name
        name: String,
        /// Hex color, e.g. #3B82F6
        #[arg(long, default_value = "#6B7280")]
        color: String,
    },
    /// List categories
    List,
    /// Delete a category; its subtasks keep running uncategorized
    Delete {
        /// Category ID
        id: String,
    },
    /// XP and level per category
    Stats,
}

pub async fn run(action: CategoryAction, json: bool) -> CliResult {
    let backend = backend()?;

    match action {
        CategoryAction::Add { name, color } => {
            let category = backend.create_category(&name, &color).await?;
            if json {
                print_json(&category)?;
            } else {
                println!("Category created: {}", category.id);
            }
        }
        CategoryAction::List => {
            let categories = backend.list_categories().await?;
            if json {
                return print_json(&categories);
            }
            for c in categories {
                println!("{}  {} {}", c.id, c.color, c.name);
            }
        }
        CategoryAction::Delete { id } => {
            backend.delete_category(&id).await?;
            if json {
                print_json(&serde_json::json!({ "deleted": id }))?;
            } else {
                println!("Category deleted: {id}");
            }
        }
        CategoryAction::Stats => {
            let stats = backend.get_all_category_stats().await?;
            if json {
                return print_json(&stats);
            }
            for s in stats {
                println!(
                    "{:<12} level {:>2}  {:>6} XP  ({} to next)  {} subtasks",
                    s.name, s.level, s.total_xp, s.xp_for_next_level, s.subtasks_completed
                );
            }
        }
    }
    Ok(())
}
