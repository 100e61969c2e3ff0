//! Named cross-window events and their payloads.
//!
//! | Event              | Direction       | Receiver effect                        |
//! |--------------------|-----------------|----------------------------------------|
//! | `tracker:load`     | main → tracker  | full replace of tracker display state  |
//! | `tracker:updated`  | tracker → main  | main refetches task + session          |
//! | `tracker:close`    | main → tracker  | tracker closes                         |
//! | `summary:load`     | main → summary  | summary refetches metrics and focuses  |
//! | `summary:refresh`  | summary → main  | main refetches list, leaves detail     |

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::WindowLabel;
use crate::error::CoreError;

pub const TRACKER_LOAD: &str = "tracker:load";
pub const TRACKER_UPDATED: &str = "tracker:updated";
pub const TRACKER_CLOSE: &str = "tracker:close";
pub const SUMMARY_LOAD: &str = "summary:load";
pub const SUMMARY_REFRESH: &str = "summary:refresh";

/// Every event name, for hosts that register listeners by string.
pub const EVENT_NAMES: [&str; 5] = [
    TRACKER_LOAD,
    TRACKER_UPDATED,
    TRACKER_CLOSE,
    SUMMARY_LOAD,
    SUMMARY_REFRESH,
];

/// Display seed pushed to the tracker window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerLoad {
    pub subtask_id: String,
    pub title: String,
    pub seconds: u64,
    pub paused: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_color: Option<String>,
}

/// What the tracker window just did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerAction {
    Pause,
    Resume,
    Done,
}

impl fmt::Display for TrackerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerAction::Pause => write!(f, "pause"),
            TrackerAction::Resume => write!(f, "resume"),
            TrackerAction::Done => write!(f, "done"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerUpdated {
    pub action: TrackerAction,
    pub subtask_id: String,
}

/// Payload of the summary events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRef {
    pub task_id: String,
}

/// Typed sync event. Call sites never touch raw event-name strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    TrackerLoad(TrackerLoad),
    TrackerUpdated(TrackerUpdated),
    TrackerClose,
    SummaryLoad(TaskRef),
    SummaryRefresh(TaskRef),
}

impl SyncEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SyncEvent::TrackerLoad(_) => TRACKER_LOAD,
            SyncEvent::TrackerUpdated(_) => TRACKER_UPDATED,
            SyncEvent::TrackerClose => TRACKER_CLOSE,
            SyncEvent::SummaryLoad(_) => SUMMARY_LOAD,
            SyncEvent::SummaryRefresh(_) => SUMMARY_REFRESH,
        }
    }

    /// Window the event is addressed to.
    pub fn target(&self) -> WindowLabel {
        match self {
            SyncEvent::TrackerLoad(_) | SyncEvent::TrackerClose => WindowLabel::SubtaskTracker,
            SyncEvent::TrackerUpdated(_) | SyncEvent::SummaryRefresh(_) => WindowLabel::Main,
            SyncEvent::SummaryLoad(_) => WindowLabel::TaskSummary,
        }
    }

    /// JSON payload; `tracker:close` carries `null`.
    pub fn payload(&self) -> Result<Value, CoreError> {
        let value = match self {
            SyncEvent::TrackerLoad(p) => serde_json::to_value(p)?,
            SyncEvent::TrackerUpdated(p) => serde_json::to_value(p)?,
            SyncEvent::TrackerClose => Value::Null,
            SyncEvent::SummaryLoad(p) | SyncEvent::SummaryRefresh(p) => serde_json::to_value(p)?,
        };
        Ok(value)
    }

    /// Rebuild a typed event from its wire name and payload.
    pub fn decode(name: &str, payload: Value) -> Result<Self, CoreError> {
        let event = match name {
            TRACKER_LOAD => SyncEvent::TrackerLoad(serde_json::from_value(payload)?),
            TRACKER_UPDATED => SyncEvent::TrackerUpdated(serde_json::from_value(payload)?),
            TRACKER_CLOSE => SyncEvent::TrackerClose,
            SUMMARY_LOAD => SyncEvent::SummaryLoad(serde_json::from_value(payload)?),
            SUMMARY_REFRESH => SyncEvent::SummaryRefresh(serde_json::from_value(payload)?),
            other => {
                return Err(crate::error::ValidationError::InvalidValue {
                    field: "event".into(),
                    message: format!("unknown sync event '{other}'"),
                }
                .into())
            }
        };
        Ok(event)
    }

    /// Decode from a raw JSON string, as delivered by webview event bridges.
    pub fn decode_str(name: &str, raw: &str) -> Result<Self, CoreError> {
        let payload = if raw.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(raw)?
        };
        Self::decode(name, payload)
    }
}
