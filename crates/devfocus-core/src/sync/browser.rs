//! Window host for processes without a webview.
//!
//! No native windows exist, so every `get_or_create` degrades to the
//! browser-tab fallback, opened with the system handler. Emits always find
//! no listener.

use super::window::{WindowHost, WindowLabel, WindowSpec};
use crate::error::WindowError;

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserWindowHost;

impl WindowHost for BrowserWindowHost {
    type Handle = WindowLabel;

    fn find(&self, _label: WindowLabel) -> Option<WindowLabel> {
        None
    }

    fn create(&self, spec: &WindowSpec) -> Result<WindowLabel, WindowError> {
        Err(WindowError::CreationFailed {
            label: spec.label.to_string(),
            message: "no webview in this process".into(),
        })
    }

    fn focus(&self, handle: &WindowLabel) -> Result<(), WindowError> {
        Err(WindowError::NotFound(handle.to_string()))
    }

    fn close(&self, _handle: &WindowLabel) -> Result<(), WindowError> {
        Ok(())
    }

    fn emit_to(
        &self,
        label: WindowLabel,
        _event: &str,
        _payload: serde_json::Value,
    ) -> Result<(), WindowError> {
        Err(WindowError::NotFound(label.to_string()))
    }

    fn open_fallback(&self, url: &str) -> Result<(), WindowError> {
        open::that(url).map_err(|e| WindowError::FallbackFailed {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::{Bootstrap, Delivery, SyncEvent, WindowManager};

    #[test]
    fn emits_find_no_listener() {
        let windows = WindowManager::new(BrowserWindowHost, "http://localhost:1420");
        assert_eq!(windows.emit(&SyncEvent::TrackerClose), Delivery::NoListener);
        assert!(!windows.is_open(WindowLabel::Main));
    }

    #[test]
    fn create_is_refused() {
        let spec = WindowSpec::with_defaults(Bootstrap::GeneralSummary);
        assert!(matches!(
            BrowserWindowHost.create(&spec),
            Err(WindowError::CreationFailed { .. })
        ));
    }
}
