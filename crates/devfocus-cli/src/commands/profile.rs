//! Profile command for CLI.

use devfocus_core::{Backend, ProfileView};

use super::{backend, print_json, CliResult};

pub async fn run(json: bool) -> CliResult {
    let backend = backend()?;
    let profile = backend.get_user_profile().await?;
    let view = ProfileView::from_profile(&profile, chrono::Utc::now().date_naive());

    if json {
        return print_json(&view);
    }

    println!("Level {} ({} XP)", view.level, view.total_xp);
    println!(
        "  {:.0}% to level {}, {} XP to go",
        view.progress_percentage,
        view.level + 1,
        view.xp_for_next_level
    );
    println!(
        "Streak: {} days (best {}), bonus {}%",
        view.current_streak, view.longest_streak, view.streak_bonus_percentage
    );
    println!("  next milestone at {} days", view.next_milestone);
    if view.streak_at_risk {
        println!("  work today to keep the streak");
    }
    Ok(())
}
