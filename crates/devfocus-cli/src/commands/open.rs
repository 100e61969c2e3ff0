//! Open a summary view in the system browser.
//!
//! The CLI has no webview, so the window manager always lands on the
//! browser-tab fallback against `windows.fallback_base_url`.

use clap::Subcommand;
use devfocus_core::sync::{Bootstrap, BrowserWindowHost, Presentation};
use devfocus_core::Config;

use super::CliResult;

#[derive(Subcommand)]
pub enum OpenAction {
    /// Global summary
    General,
    /// Summary for one task
    Task {
        /// Task ID
        id: String,
    },
}

pub fn run(action: OpenAction, config: &Config) -> CliResult {
    let bootstrap = match action {
        OpenAction::General => Bootstrap::GeneralSummary,
        OpenAction::Task { id } => {
            devfocus_core::task::validate_id("taskId", &id)?;
            Bootstrap::TaskSummary { task_id: id }
        }
    };

    let windows = config.windows.manager(BrowserWindowHost);
    match windows.get_or_create(bootstrap) {
        Presentation::Fallback { url } => {
            println!("Opened {url}");
            Ok(())
        }
        Presentation::Unavailable => Err("could not open a browser".into()),
        _ => Ok(()),
    }
}
