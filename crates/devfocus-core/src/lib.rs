//! # DevFocus Core Library
//!
//! This library provides the core logic for the DevFocus task tracker:
//! subtasks accrue time across start/pause/resume/complete cycles, award
//! points and XP, and show one consistent live timer across several windows
//! that share no memory. The CLI and the Tauri desktop shell are thin layers
//! over the same library.
//!
//! ## Architecture
//!
//! - **Session**: the subtask/session state machine and the elapsed-time
//!   reconstruction every window uses to display or submit a total
//! - **Timer**: a per-window counter the caller advances once per period via
//!   `tick()`, reseeded from authoritative values
//! - **Scoring**: pure XP, level and streak-bonus formulas
//! - **Sync**: named cross-window events and a label-keyed window registry
//! - **Stats**: per-task and global rollups
//! - **Backend**: the asynchronous command surface, with a SQLite reference
//!   implementation
//! - **Views**: per-window controllers with freshness-guarded stores
//!
//! ## Key Components
//!
//! - [`SessionStateMachine`]: legal transitions and timestamp bookkeeping
//! - [`TimerEngine`]: ticking display counter
//! - [`WindowManager`]: idempotent window open, typed emit
//! - [`Backend`] / [`LocalBackend`]: command surface and its SQLite implementation
//! - [`Config`]: application configuration management

pub mod backend;
pub mod error;
pub mod profile;
pub mod scoring;
pub mod session;
pub mod stats;
pub mod storage;
pub mod sync;
pub mod task;
pub mod timer;
pub mod views;

pub use backend::{Backend, LocalBackend, SubtaskCompletion};
pub use error::{
    BackendError, ConfigError, CoreError, DatabaseError, TransitionError, ValidationError,
    WindowError,
};
pub use profile::{CategoryExperience, CategoryStats, ProfileView, UserProfile};
pub use session::{displayed_total, SessionAction, SessionStateMachine, SubtaskStatus, TimeSession};
pub use stats::{GeneralMetrics, TaskMetrics};
pub use storage::{Config, Database};
pub use sync::{Bootstrap, SyncEvent, WindowHost, WindowLabel, WindowManager};
pub use task::{Category, Subtask, Task, TaskStatus};
pub use timer::{TimerEngine, TimerState};
pub use views::{GeneralSummaryWindow, MainWindow, TaskSummaryWindow, TrackerWindow, ViewContext};
