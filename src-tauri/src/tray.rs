//! System tray integration for the DevFocus desktop application.
//!
//! Menu: show the main window, open the general summary, quit.

use tauri::{
    menu::{Menu, MenuItem},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    App, AppHandle, Manager,
};

use crate::bridge::DesktopState;

fn show_main(app: &AppHandle) {
    if let Some(win) = app.get_webview_window("main") {
        let _ = win.unminimize();
        let _ = win.show();
        let _ = win.set_focus();
    }
}

/// Sets up the system tray with menu items and event handlers.
///
/// # Errors
/// Returns an error if tray icon or menu creation fails
pub fn setup(app: &App) -> Result<(), Box<dyn std::error::Error>> {
    let show = MenuItem::with_id(app, "show", "Show", true, None::<&str>)?;
    let summary = MenuItem::with_id(app, "summary", "General Summary", true, None::<&str>)?;
    let quit = MenuItem::with_id(app, "quit", "Quit", true, None::<&str>)?;

    let menu = Menu::with_items(app, &[&show, &summary, &quit])?;

    let _tray = TrayIconBuilder::new()
        .tooltip("DevFocus")
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_menu_event(move |app, event| match event.id().as_ref() {
            "show" => show_main(app),
            "summary" => {
                let state = app.state::<DesktopState>();
                let presentation = state.main.open_general_summary();
                tracing::debug!("general summary from tray: {presentation:?}");
            }
            "quit" => {
                tracing::info!("quit requested via tray menu");
                app.exit(0);
            }
            _ => {}
        })
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                show_main(tray.app_handle());
            }
        })
        .build(app)?;

    Ok(())
}
