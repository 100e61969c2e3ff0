//! Tauri implementation of the core window seam.
//!
//! Every label maps to one webview window. Creation goes through
//! `WebviewWindowBuilder` with the bootstrap query in the app URL, so a
//! freshly created window can paint before any event arrives.

use devfocus_core::sync::{WindowHost, WindowLabel, WindowSpec};
use devfocus_core::WindowError;
use tauri::{AppHandle, Emitter, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use tauri_plugin_opener::OpenerExt;

#[derive(Clone)]
pub struct TauriWindowHost {
    app: AppHandle,
}

impl TauriWindowHost {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

fn failed(op: &'static str, label: impl ToString, e: tauri::Error) -> WindowError {
    WindowError::OperationFailed {
        op,
        label: label.to_string(),
        message: e.to_string(),
    }
}

impl WindowHost for TauriWindowHost {
    type Handle = WebviewWindow;

    fn find(&self, label: WindowLabel) -> Option<WebviewWindow> {
        self.app.get_webview_window(label.as_str())
    }

    fn create(&self, spec: &WindowSpec) -> Result<WebviewWindow, WindowError> {
        let url = WebviewUrl::App(spec.app_path().trim_start_matches('/').into());
        let geometry = &spec.geometry;
        WebviewWindowBuilder::new(&self.app, spec.label.as_str(), url)
            .title(&spec.title)
            .inner_size(geometry.width, geometry.height)
            .always_on_top(geometry.always_on_top)
            .decorations(geometry.decorations)
            .resizable(geometry.resizable)
            .center()
            .build()
            .map_err(|e| WindowError::CreationFailed {
                label: spec.label.to_string(),
                message: e.to_string(),
            })
    }

    fn focus(&self, win: &WebviewWindow) -> Result<(), WindowError> {
        win.unminimize().map_err(|e| failed("unminimize", win.label(), e))?;
        win.show().map_err(|e| failed("show", win.label(), e))?;
        win.set_focus().map_err(|e| failed("focus", win.label(), e))
    }

    fn close(&self, win: &WebviewWindow) -> Result<(), WindowError> {
        win.close().map_err(|e| failed("close", win.label(), e))
    }

    fn emit_to(
        &self,
        label: WindowLabel,
        event: &str,
        payload: serde_json::Value,
    ) -> Result<(), WindowError> {
        self.app
            .emit_to(label.as_str(), event, payload)
            .map_err(|e| WindowError::EmitFailed {
                event: event.to_string(),
                label: label.to_string(),
                message: e.to_string(),
            })
    }

    fn open_fallback(&self, url: &str) -> Result<(), WindowError> {
        let parsed = url::Url::parse(url).map_err(|e| WindowError::FallbackFailed {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        self.app
            .opener()
            .open_url(parsed.as_str(), None::<&str>)
            .map_err(|e| WindowError::FallbackFailed {
                url: url.to_string(),
                message: e.to_string(),
            })
    }
}

// ── Window chrome commands ──────────────────────────────────────────

#[tauri::command]
pub fn cmd_start_drag(window: WebviewWindow) -> Result<(), String> {
    window.start_dragging().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn cmd_set_always_on_top(window: WebviewWindow, enabled: bool) -> Result<(), String> {
    window.set_always_on_top(enabled).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn cmd_get_window_label(window: WebviewWindow) -> String {
    window.label().to_string()
}
