mod config;
pub mod database;

pub use config::{BackendConfig, Config, LoggingConfig, TimerConfig, WindowsConfig};
pub use database::{Database, DailyPoints};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `DEVFOCUS_HOME` overrides everything. Otherwise `~/.config/devfocus[-dev]/`
/// based on `DEVFOCUS_ENV` (set `DEVFOCUS_ENV=dev` for the development
/// directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("DEVFOCUS_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("DEVFOCUS_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("devfocus-dev")
            } else {
                base_dir.join("devfocus")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
