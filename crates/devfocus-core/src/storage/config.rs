//! TOML-based application configuration.
//!
//! Stores:
//! - Tick interval for the display timer
//! - Optional client-side backend timeout
//! - Window geometry per label and the browser-tab fallback origin
//! - Default log level
//!
//! Configuration is stored at `~/.config/devfocus/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::sync::{WindowGeometry, WindowHost, WindowLabel, WindowManager};

/// Display timer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

/// Backend call configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BackendConfig {
    /// Client-side timeout per backend call. Absent means wait indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Window geometry and fallback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowsConfig {
    #[serde(default = "default_fallback_base_url")]
    pub fallback_base_url: String,
    #[serde(default = "default_main_geometry")]
    pub main: WindowGeometry,
    #[serde(default = "default_tracker_geometry")]
    pub tracker: WindowGeometry,
    #[serde(default = "default_task_summary_geometry")]
    pub task_summary: WindowGeometry,
    #[serde(default = "default_general_summary_geometry")]
    pub general_summary: WindowGeometry,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/devfocus/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub windows: WindowsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

// Default functions
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_fallback_base_url() -> String {
    "http://localhost:1420".into()
}
fn default_main_geometry() -> WindowGeometry {
    WindowGeometry::defaults_for(WindowLabel::Main)
}
fn default_tracker_geometry() -> WindowGeometry {
    WindowGeometry::defaults_for(WindowLabel::SubtaskTracker)
}
fn default_task_summary_geometry() -> WindowGeometry {
    WindowGeometry::defaults_for(WindowLabel::TaskSummary)
}
fn default_general_summary_geometry() -> WindowGeometry {
    WindowGeometry::defaults_for(WindowLabel::GeneralSummary)
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for WindowsConfig {
    fn default() -> Self {
        Self {
            fallback_base_url: default_fallback_base_url(),
            main: default_main_geometry(),
            tracker: default_tracker_geometry(),
            task_summary: default_task_summary_geometry(),
            general_summary: default_general_summary_geometry(),
        }
    }
}

impl WindowsConfig {
    /// Window manager over `host` with this configuration's geometry and fallback origin.
    pub fn manager<H: WindowHost>(&self, host: H) -> WindowManager<H> {
        WindowManager::new(host, self.fallback_base_url.clone())
            .with_geometry(WindowLabel::Main, self.main.clone())
            .with_geometry(WindowLabel::SubtaskTracker, self.tracker.clone())
            .with_geometry(WindowLabel::TaskSummary, self.task_summary.clone())
            .with_geometry(WindowLabel::GeneralSummary, self.general_summary.clone())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl WindowsConfig {
    pub fn geometry(&self, label: WindowLabel) -> &WindowGeometry {
        match label {
            WindowLabel::Main => &self.main,
            WindowLabel::SubtaskTracker => &self.tracker,
            WindowLabel::TaskSummary => &self.task_summary,
            WindowLabel::GeneralSummary => &self.general_summary,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => parse_number(value).ok_or_else(|| {
                        invalid(format!("cannot parse '{value}' as number"))
                    })?,
                    // Optional fields: a number sets them, "none" or "" clears them.
                    serde_json::Value::Null => match value.trim() {
                        "" | "none" | "null" => serde_json::Value::Null,
                        v => parse_number(v)
                            .ok_or_else(|| invalid(format!("cannot parse '{v}' as number")))?,
                    },
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default config cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there if it is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value in memory by dot-separated key.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a value by key and persist.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Every leaf key with its current value, sorted by key.
    pub fn list(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            flatten("", &json, &mut out);
        }
        out.sort();
        out
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("using default configuration: {e}");
            Self::default()
        })
    }
}

fn parse_number(value: &str) -> Option<serde_json::Value> {
    if let Ok(n) = value.parse::<u64>() {
        Some(serde_json::Value::Number(n.into()))
    } else {
        value
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(serde_json::Value::Number)
    }
}

fn flatten(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
    match value {
        serde_json::Value::Object(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                flatten(&key, v, out);
            }
        }
        serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        other => out.push((prefix.to_string(), other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timer.tick_interval_ms, 1000);
        assert_eq!(parsed.windows.tracker.width, 340.0);
        assert!(parsed.backend.timeout_secs.is_none());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[backend]\ntimeout_secs = 15\n").unwrap();
        assert_eq!(parsed.backend.timeout_secs, Some(15));
        assert_eq!(parsed.logging.level, "info");
        assert_eq!(parsed.windows.fallback_base_url, "http://localhost:1420");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.tick_interval_ms").as_deref(), Some("1000"));
        assert_eq!(cfg.get("windows.tracker.always_on_top").as_deref(), Some("true"));
        assert_eq!(cfg.get("logging.level").as_deref(), Some("info"));
        assert!(cfg.get("timer.missing_key").is_none());
    }

    #[test]
    fn set_value_updates_nested_fields() {
        let mut cfg = Config::default();
        cfg.set_value("windows.task_summary.width", "900").unwrap();
        cfg.set_value("windows.tracker.always_on_top", "false").unwrap();
        cfg.set_value("logging.level", "debug").unwrap();
        assert_eq!(cfg.windows.task_summary.width, 900.0);
        assert!(!cfg.windows.tracker.always_on_top);
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn optional_timeout_can_be_set_and_cleared() {
        let mut cfg = Config::default();
        cfg.set_value("backend.timeout_secs", "30").unwrap();
        assert_eq!(cfg.backend.timeout_secs, Some(30));
        cfg.set_value("backend.timeout_secs", "none").unwrap();
        assert_eq!(cfg.backend.timeout_secs, None);
        assert!(cfg.set_value("backend.timeout_secs", "soon").is_err());
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_type() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set_value("timer.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set_value("windows.tracker.resizable", "maybe"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.set_value("", "1").is_err());
    }

    #[test]
    fn list_flattens_leaves() {
        let keys: Vec<String> = Config::default().list().into_iter().map(|(k, _)| k).collect();
        assert!(keys.contains(&"timer.tick_interval_ms".to_string()));
        assert!(keys.contains(&"windows.general_summary.height".to_string()));
        assert!(keys.contains(&"backend.timeout_secs".to_string()));
    }

    #[test]
    fn file_round_trip_and_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let created = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created.timer.tick_interval_ms, 1000);

        let mut cfg = created;
        cfg.timer.tick_interval_ms = 250;
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().timer.tick_interval_ms, 250);

        std::fs::write(&path, "timer = [[[").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn window_manager_uses_configured_geometry_and_origin() {
        use crate::sync::{Bootstrap, MemoryWindowHost};

        let mut cfg = Config::default();
        cfg.set_value("windows.general_summary.width", "1200").unwrap();
        cfg.set_value("windows.fallback_base_url", "http://127.0.0.1:9000").unwrap();

        let host = MemoryWindowHost::new();
        let windows = cfg.windows.manager(host.clone());
        windows.get_or_create(Bootstrap::GeneralSummary);
        let spec = host.last_spec(WindowLabel::GeneralSummary).unwrap();
        assert_eq!(spec.geometry.width, 1200.0);

        host.fail_create(WindowLabel::TaskSummary);
        windows.get_or_create(Bootstrap::TaskSummary { task_id: "t1".into() });
        assert!(host.fallbacks()[0].starts_with("http://127.0.0.1:9000/"));
    }
}
