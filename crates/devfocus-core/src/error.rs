//! Core error types for devfocus-core.
//!
//! One enum per failure family, wrapped by [`CoreError`] so callers can
//! propagate with `?` and still match on the family when deciding how to
//! surface the failure (validation message, per-view error badge, fallback
//! presentation).

use std::path::PathBuf;
use thiserror::Error;

use crate::session::{SessionAction, SubtaskStatus};

/// Core error type for devfocus-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Input rejected before any backend call
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Illegal subtask/session transition
    #[error("{0}")]
    Transition(#[from] TransitionError),

    /// A backend command failed
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// A window could not be found, created or reached
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Input validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A title or name was empty after trimming
    #[error("'{field}' must not be empty")]
    EmptyTitle { field: &'static str },

    /// An identifier was missing or blank
    #[error("missing identifier '{field}'")]
    MissingId { field: &'static str },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Category colors are `#rrggbb`
    #[error("Invalid color '{0}', expected #rrggbb")]
    InvalidColor(String),
}

/// Returned when an action is not legal from the subtask's current status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid transition: cannot {action} subtask {subtask_id} while {from}")]
pub struct TransitionError {
    pub subtask_id: String,
    pub from: SubtaskStatus,
    pub action: SessionAction,
}

/// Failure of a backend command invocation.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Referenced entity does not exist
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// The backend refused a state transition
    #[error("{0}")]
    Rejected(#[from] TransitionError),

    /// The backend refused the input
    #[error("{0}")]
    Invalid(#[from] ValidationError),

    /// Storage failure inside the backend
    #[error("storage failure: {0}")]
    Storage(#[from] DatabaseError),

    /// Client-side timeout elapsed before the backend answered
    #[error("'{command}' timed out after {secs}s")]
    Timeout { command: &'static str, secs: u64 },

    /// Transport-level failure (RPC boundary)
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Window lifecycle and event delivery failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// No live window for the label
    #[error("window '{0}' not found")]
    NotFound(String),

    /// The host refused to create the window (creation race, OS refusal)
    #[error("failed to create window '{label}': {message}")]
    CreationFailed { label: String, message: String },

    /// Focus/close/unminimize failed on a live window
    #[error("window operation '{op}' failed on '{label}': {message}")]
    OperationFailed {
        label: String,
        op: &'static str,
        message: String,
    },

    /// Event could not be delivered
    #[error("failed to emit '{event}' to '{label}': {message}")]
    EmitFailed {
        label: String,
        event: String,
        message: String,
    },

    /// Even the browser-tab fallback failed
    #[error("fallback presentation failed for {url}: {message}")]
    FallbackFailed { url: String, message: String },
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// A stored value could not be decoded
    #[error("Corrupt value in column '{column}': {value}")]
    Corrupt { column: &'static str, value: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Config file exists but is not valid TOML for [`crate::Config`]
    #[error("Failed to parse configuration at {path}: {message}")]
    ParseFailed { path: PathBuf, message: String },

    /// Unknown dotted key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Could not resolve the data directory
    #[error("cannot resolve data directory: {0}")]
    DataDir(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for BackendError {
    fn from(err: rusqlite::Error) -> Self {
        BackendError::Storage(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
