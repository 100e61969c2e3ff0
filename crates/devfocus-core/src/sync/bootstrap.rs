//! Bootstrap parameters carried in a new window's initial URL.
//!
//! ```text
//! main            index.html
//! tracker         index.html?view=subtask-tracker&subtaskId=..&title=..&seconds=..&paused=0|1[&categoryName=..&categoryColor=..]
//! task summary    index.html?view=task-summary&taskId=..
//! general summary index.html?view=summary
//! ```
//!
//! These only seed the first paint. The first sync event supersedes them.

use url::Url;

use super::events::TrackerLoad;
use super::WindowLabel;
use crate::error::WindowError;

const DEFAULT_TRACKER_TITLE: &str = "Subtask";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bootstrap {
    Main,
    Tracker(TrackerLoad),
    TaskSummary { task_id: String },
    GeneralSummary,
}

impl Bootstrap {
    pub fn label(&self) -> WindowLabel {
        match self {
            Bootstrap::Main => WindowLabel::Main,
            Bootstrap::Tracker(_) => WindowLabel::SubtaskTracker,
            Bootstrap::TaskSummary { .. } => WindowLabel::TaskSummary,
            Bootstrap::GeneralSummary => WindowLabel::GeneralSummary,
        }
    }

    /// Encoded query string, without the leading `?`.
    pub fn query(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        match self {
            Bootstrap::Main => {}
            Bootstrap::Tracker(seed) => {
                pairs.push(("view", "subtask-tracker".into()));
                pairs.push(("subtaskId", seed.subtask_id.clone()));
                pairs.push(("title", seed.title.clone()));
                pairs.push(("seconds", seed.seconds.to_string()));
                pairs.push(("paused", if seed.paused { "1" } else { "0" }.into()));
                if let Some(name) = &seed.category_name {
                    pairs.push(("categoryName", name.clone()));
                }
                if let Some(color) = &seed.category_color {
                    pairs.push(("categoryColor", color.clone()));
                }
            }
            Bootstrap::TaskSummary { task_id } => {
                pairs.push(("view", "task-summary".into()));
                pairs.push(("taskId", task_id.clone()));
            }
            Bootstrap::GeneralSummary => pairs.push(("view", "summary".into())),
        }
        pairs
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// App-relative path handed to the webview.
    pub fn app_path(&self) -> String {
        let query = self.query();
        if query.is_empty() {
            "index.html".to_string()
        } else {
            format!("index.html?{query}")
        }
    }

    /// Absolute URL for the browser-tab fallback.
    pub fn fallback_url(&self, base: &str) -> Result<String, WindowError> {
        let mut url = Url::parse(base).map_err(|e| WindowError::FallbackFailed {
            url: base.to_string(),
            message: e.to_string(),
        })?;
        url.set_path("/");
        let query = self.query();
        url.set_query((!query.is_empty()).then_some(query.as_str()));
        Ok(url.to_string())
    }

    /// Parse a window URL (absolute or app-relative). Unknown views are `Main`.
    pub fn parse(location: &str) -> Bootstrap {
        let query = location.split_once('?').map(|(_, q)| q).unwrap_or("");
        let params: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        match get("view") {
            Some("subtask-tracker") => Bootstrap::Tracker(TrackerLoad {
                subtask_id: get("subtaskId").unwrap_or_default().to_string(),
                title: get("title")
                    .filter(|t| !t.is_empty())
                    .unwrap_or(DEFAULT_TRACKER_TITLE)
                    .to_string(),
                seconds: parse_seconds(get("seconds")),
                paused: get("paused") == Some("1"),
                category_name: get("categoryName").map(str::to_string),
                category_color: get("categoryColor").map(str::to_string),
            }),
            Some("task-summary") => Bootstrap::TaskSummary {
                task_id: get("taskId").unwrap_or_default().to_string(),
            },
            Some("summary") => Bootstrap::GeneralSummary,
            _ => Bootstrap::Main,
        }
    }
}

/// Finite, non-negative, floored; anything else is 0.
fn parse_seconds(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.floor() as u64)
        .unwrap_or(0)
}
