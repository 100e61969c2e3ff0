//! Window registry.
//!
//! [`WindowManager`] maps each fixed [`WindowLabel`] to at most one live
//! handle. The host's own label table is the only source of truth, so a
//! window the user closed by hand is never reported as open. Opening is idempotent: a live label is focused in place rather
//! than duplicated. Every window operation is best effort; failures are
//! logged and degrade to a browser-tab fallback instead of propagating.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::bootstrap::Bootstrap;
use super::events::SyncEvent;
use crate::error::WindowError;

/// Logical window names. Each has at most one live instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowLabel {
    Main,
    SubtaskTracker,
    TaskSummary,
    GeneralSummary,
}

impl WindowLabel {
    pub const ALL: [WindowLabel; 4] = [
        WindowLabel::Main,
        WindowLabel::SubtaskTracker,
        WindowLabel::TaskSummary,
        WindowLabel::GeneralSummary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WindowLabel::Main => "main",
            WindowLabel::SubtaskTracker => "subtask-tracker",
            WindowLabel::TaskSummary => "task-summary",
            WindowLabel::GeneralSummary => "general-summary",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WindowLabel::Main => "DevFocus",
            WindowLabel::SubtaskTracker => "Tracker",
            WindowLabel::TaskSummary => "Task Summary",
            WindowLabel::GeneralSummary => "Summary",
        }
    }
}

impl fmt::Display for WindowLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WindowLabel {
    type Err = WindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WindowLabel::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| WindowError::NotFound(s.to_string()))
    }
}

/// Geometry and chrome flags for one window kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub always_on_top: bool,
    #[serde(default = "default_true")]
    pub decorations: bool,
    #[serde(default = "default_true")]
    pub resizable: bool,
}

fn default_true() -> bool {
    true
}

impl WindowGeometry {
    pub fn defaults_for(label: WindowLabel) -> Self {
        match label {
            WindowLabel::Main => Self {
                width: 1100.0,
                height: 760.0,
                always_on_top: false,
                decorations: true,
                resizable: true,
            },
            WindowLabel::SubtaskTracker => Self {
                width: 340.0,
                height: 260.0,
                always_on_top: true,
                decorations: false,
                resizable: false,
            },
            WindowLabel::TaskSummary => Self {
                width: 860.0,
                height: 640.0,
                always_on_top: false,
                decorations: true,
                resizable: true,
            },
            WindowLabel::GeneralSummary => Self {
                width: 960.0,
                height: 680.0,
                always_on_top: false,
                decorations: true,
                resizable: true,
            },
        }
    }
}

/// Everything a host needs to build a window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    pub label: WindowLabel,
    pub title: String,
    pub geometry: WindowGeometry,
    pub bootstrap: Bootstrap,
}

impl WindowSpec {
    pub fn new(bootstrap: Bootstrap, geometry: WindowGeometry) -> Self {
        let label = bootstrap.label();
        Self {
            label,
            title: label.title().to_string(),
            geometry,
            bootstrap,
        }
    }

    /// Spec with the built-in geometry for the bootstrap's label.
    pub fn with_defaults(bootstrap: Bootstrap) -> Self {
        let geometry = WindowGeometry::defaults_for(bootstrap.label());
        Self::new(bootstrap, geometry)
    }

    pub fn app_path(&self) -> String {
        self.bootstrap.app_path()
    }
}

/// Platform seam for window lifecycle and event delivery.
///
/// Implemented over Tauri in the desktop shell and in memory for tests.
pub trait WindowHost: Send + Sync {
    type Handle: Clone + Send + Sync;

    /// Live window for `label`, if any.
    fn find(&self, label: WindowLabel) -> Option<Self::Handle>;

    fn create(&self, spec: &WindowSpec) -> Result<Self::Handle, WindowError>;

    /// Bring to front and unminimize.
    fn focus(&self, handle: &Self::Handle) -> Result<(), WindowError>;

    fn close(&self, handle: &Self::Handle) -> Result<(), WindowError>;

    fn emit_to(
        &self,
        label: WindowLabel,
        event: &str,
        payload: serde_json::Value,
    ) -> Result<(), WindowError>;

    /// Open `url` as a plain browser tab.
    fn open_fallback(&self, url: &str) -> Result<(), WindowError>;
}

/// How a `get_or_create` request was satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    /// Label was already live; focused in place.
    Focused,
    /// New window created.
    Created,
    /// Window creation failed; opened a browser tab instead.
    Fallback { url: String },
    /// Even the fallback failed. Logged; caller carries on.
    Unavailable,
}

impl Presentation {
    pub fn is_window(&self) -> bool {
        matches!(self, Presentation::Focused | Presentation::Created)
    }
}

/// Outcome of a typed emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// No live target window. Not an error.
    NoListener,
    Failed,
}

/// Live windows keyed by label.
pub struct WindowManager<H: WindowHost> {
    host: H,
    fallback_base_url: String,
    geometry: HashMap<WindowLabel, WindowGeometry>,
}

impl<H: WindowHost> WindowManager<H> {
    pub fn new(host: H, fallback_base_url: impl Into<String>) -> Self {
        let geometry = WindowLabel::ALL
            .into_iter()
            .map(|l| (l, WindowGeometry::defaults_for(l)))
            .collect();
        Self {
            host,
            fallback_base_url: fallback_base_url.into(),
            geometry,
        }
    }

    /// Override the geometry used for `label`.
    pub fn with_geometry(mut self, label: WindowLabel, geometry: WindowGeometry) -> Self {
        self.geometry.insert(label, geometry);
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Live handle for `label`.
    pub fn lookup(&self, label: WindowLabel) -> Option<H::Handle> {
        self.host.find(label)
    }

    pub fn is_open(&self, label: WindowLabel) -> bool {
        self.lookup(label).is_some()
    }

    /// Focus the live window for the bootstrap's label, or create one.
    pub fn get_or_create(&self, bootstrap: Bootstrap) -> Presentation {
        let label = bootstrap.label();
        if let Some(handle) = self.lookup(label) {
            if let Err(e) = self.host.focus(&handle) {
                tracing::warn!("focus failed for {label}: {e}");
            }
            return Presentation::Focused;
        }

        let geometry = self
            .geometry
            .get(&label)
            .cloned()
            .unwrap_or_else(|| WindowGeometry::defaults_for(label));
        let spec = WindowSpec::new(bootstrap, geometry);
        match self.host.create(&spec) {
            Ok(_) => {
                tracing::info!("created window {label} at {}", spec.app_path());
                Presentation::Created
            }
            Err(e) => {
                // A creation race may have produced the window after all.
                if let Some(handle) = self.lookup(label) {
                    tracing::debug!("window {label} appeared during creation race: {e}");
                    let _ = self.host.focus(&handle);
                    return Presentation::Focused;
                }
                tracing::warn!("window {label} unavailable, falling back to browser tab: {e}");
                self.fallback(&spec.bootstrap)
            }
        }
    }

    /// Close the window for `label` if it is live. Missing is fine.
    pub fn close(&self, label: WindowLabel) {
        if let Some(handle) = self.lookup(label) {
            if let Err(e) = self.host.close(&handle) {
                tracing::warn!("close failed for {label}: {e}");
            }
        }
    }

    /// Emit a typed event to its target window. Never fails the caller.
    pub fn emit(&self, event: &SyncEvent) -> Delivery {
        let target = event.target();
        if self.lookup(target).is_none() {
            tracing::debug!("no listener for {} on {target}", event.name());
            return Delivery::NoListener;
        }
        let payload = match event.payload() {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("could not encode {}: {e}", event.name());
                return Delivery::Failed;
            }
        };
        match self.host.emit_to(target, event.name(), payload) {
            Ok(()) => Delivery::Delivered,
            Err(e) => {
                tracing::warn!("emit failed: {e}");
                Delivery::Failed
            }
        }
    }

    fn fallback(&self, bootstrap: &Bootstrap) -> Presentation {
        let url = match bootstrap.fallback_url(&self.fallback_base_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("{e}");
                return Presentation::Unavailable;
            }
        };
        match self.host.open_fallback(&url) {
            Ok(()) => Presentation::Fallback { url },
            Err(e) => {
                tracing::warn!("{e}");
                Presentation::Unavailable
            }
        }
    }
}
