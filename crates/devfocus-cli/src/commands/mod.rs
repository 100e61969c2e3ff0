//! Subcommand implementations. Each talks to the same [`LocalBackend`] the
//! desktop app uses.

pub mod category;
pub mod config;
pub mod metrics;
pub mod open;
pub mod profile;
pub mod subtask;
pub mod task;
pub mod track;

use devfocus_core::LocalBackend;
use serde::Serialize;

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub fn backend() -> Result<LocalBackend, devfocus_core::CoreError> {
    let backend = LocalBackend::open()?;
    tracing::debug!("opened local backend");
    Ok(backend)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
