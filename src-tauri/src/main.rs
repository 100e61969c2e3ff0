// Prevents additional console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! DevFocus Desktop Application
//!
//! A Tauri shell over the DevFocus core. Each window is a webview; the
//! window controllers live here in Rust and exchange the core sync events
//! through Tauri's event bus.

use std::sync::Arc;

use devfocus_core::sync::{SyncEvent, EVENT_NAMES};
use devfocus_core::{Config, LocalBackend};
use tauri::{Listener, Manager};
use tracing_subscriber::EnvFilter;

mod bridge;
mod tray;
mod window;

use bridge::DesktopState;

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Forward every sync event, whoever emitted it, to its target controller.
fn listen_sync_events(app: &tauri::AppHandle) {
    for name in EVENT_NAMES {
        let handle = app.clone();
        app.listen_any(name, move |event| {
            let sync = match SyncEvent::decode_str(name, event.payload()) {
                Ok(sync) => sync,
                Err(e) => {
                    tracing::warn!("dropping malformed {name}: {e}");
                    return;
                }
            };
            let handle = handle.clone();
            tauri::async_runtime::spawn(async move {
                handle.state::<DesktopState>().dispatch(sync).await;
            });
        });
    }
}

fn main() {
    let config = Config::load_or_default();
    init_tracing(&config);

    let backend = match LocalBackend::open() {
        Ok(backend) => Arc::new(backend),
        Err(e) => {
            eprintln!("Failed to initialize database: {e}");
            std::process::exit(1);
        }
    };

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_notification::init())
        .setup(move |app| {
            let handle = app.handle().clone();
            let state = tauri::async_runtime::block_on(async {
                DesktopState::new(&handle, backend, &config)
            });
            app.manage(state);
            listen_sync_events(&handle);

            #[cfg(debug_assertions)]
            if let Some(window) = app.get_webview_window("main") {
                window.open_devtools();
            }
            tray::setup(app)?;

            tauri::async_runtime::spawn(async move {
                if let Err(e) = handle.state::<DesktopState>().main.refresh().await {
                    tracing::warn!("initial refresh failed: {e}");
                }
            });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Window commands
            window::cmd_start_drag,
            window::cmd_set_always_on_top,
            window::cmd_get_window_label,
            // Backend commands
            bridge::cmd_create_task,
            bridge::cmd_list_tasks_with_active_subtasks,
            bridge::cmd_get_task_with_subtasks_and_sessions,
            bridge::cmd_update_task_status,
            bridge::cmd_delete_task,
            bridge::cmd_create_subtask,
            bridge::cmd_delete_subtask,
            bridge::cmd_start_subtask,
            bridge::cmd_pause_subtask,
            bridge::cmd_resume_subtask,
            bridge::cmd_complete_subtask,
            bridge::cmd_get_subtask_with_session,
            bridge::cmd_get_task_metrics,
            bridge::cmd_get_general_metrics,
            bridge::cmd_create_category,
            bridge::cmd_list_categories,
            bridge::cmd_delete_category,
            bridge::cmd_get_category_experience,
            bridge::cmd_get_all_category_stats,
            bridge::cmd_get_user_profile,
            // Main window
            bridge::cmd_main_snapshot,
            bridge::cmd_main_refresh,
            bridge::cmd_main_create_task,
            bridge::cmd_main_delete_task,
            bridge::cmd_main_open_task,
            bridge::cmd_main_back,
            bridge::cmd_main_create_subtask,
            bridge::cmd_main_delete_subtask,
            bridge::cmd_main_start_subtask,
            bridge::cmd_main_pause_subtask,
            bridge::cmd_main_resume_subtask,
            bridge::cmd_main_complete_subtask,
            bridge::cmd_open_general_summary,
            // Tracker window
            bridge::cmd_tracker_snapshot,
            bridge::cmd_tracker_toggle,
            bridge::cmd_tracker_done,
            // Summary windows
            bridge::cmd_task_summary_load,
            bridge::cmd_task_summary_finish,
            bridge::cmd_general_summary_refresh,
            bridge::cmd_general_summary_close,
            // Config commands
            bridge::cmd_config_get,
            bridge::cmd_config_set,
            bridge::cmd_config_list,
        ])
        .run(tauri::generate_context!())
        .unwrap_or_else(|e| {
            eprintln!("Tauri application error: {}", e);
            std::process::exit(1);
        });
}
