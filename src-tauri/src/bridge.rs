//! Tauri commands over the DevFocus core.
//!
//! Two layers: `cmd_<command>` mirrors the backend command surface one to
//! one for webviews that keep their own state, and the `cmd_main_*`,
//! `cmd_tracker_*` and `cmd_*_summary_*` commands drive the in-process
//! window controllers, which own freshness and cross-window sync.

use std::sync::Arc;

use devfocus_core::timer::{Ticker, TickerHandle};
use devfocus_core::views::{GeneralSummaryStore, MainStore, TaskSummaryStore, TrackerWindowState};
use devfocus_core::{
    Backend, Config, GeneralSummaryWindow, LocalBackend, MainWindow, SubtaskCompletion,
    SyncEvent, TaskStatus, TaskSummaryWindow, TrackerWindow, ViewContext, WindowLabel,
};
use serde_json::Value;
use tauri::{AppHandle, State};
use tauri_plugin_notification::NotificationExt;

use crate::window::TauriWindowHost;

type Ctx = ViewContext<LocalBackend, TauriWindowHost>;

/// Everything the desktop process shares between commands and listeners.
pub struct DesktopState {
    pub backend: Arc<LocalBackend>,
    pub main: MainWindow<LocalBackend, TauriWindowHost>,
    pub tracker: Arc<TrackerWindow<LocalBackend, TauriWindowHost>>,
    pub task_summary: TaskSummaryWindow<LocalBackend, TauriWindowHost>,
    pub general_summary: GeneralSummaryWindow<LocalBackend, TauriWindowHost>,
    _ticker: TickerHandle,
}

impl DesktopState {
    /// Build the controllers and start the tracker's tick loop. Must run
    /// inside the async runtime.
    pub fn new(app: &AppHandle, backend: Arc<LocalBackend>, config: &Config) -> Self {
        let windows = Arc::new(config.windows.manager(TauriWindowHost::new(app.clone())));
        let ctx: Ctx = ViewContext::new(backend.clone(), windows).configured(config);
        let tracker = Arc::new(TrackerWindow::new(ctx.clone()));
        let ticker = tracker.spawn_ticker(Ticker::from_millis(config.timer.tick_interval_ms));
        Self {
            backend,
            main: MainWindow::new(ctx.clone()),
            tracker,
            task_summary: TaskSummaryWindow::new(ctx.clone()),
            general_summary: GeneralSummaryWindow::new(ctx),
            _ticker: ticker,
        }
    }

    /// Route a sync event to the controller of its target window.
    pub async fn dispatch(&self, event: SyncEvent) {
        let name = event.name();
        let result = match event.target() {
            WindowLabel::Main => self.main.handle_event(event).await,
            WindowLabel::SubtaskTracker => {
                self.tracker.handle_event(event);
                Ok(())
            }
            WindowLabel::TaskSummary => self.task_summary.handle_event(event).await,
            WindowLabel::GeneralSummary => Ok(()),
        };
        if let Err(e) = result {
            tracing::warn!("handling {name} failed: {e}");
        }
    }
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

fn notify_completion(app: &AppHandle, completion: &SubtaskCompletion) {
    let body = format!(
        "+{} points, +{} XP",
        completion.points_earned, completion.xp_gained
    );
    if let Err(e) = app
        .notification()
        .builder()
        .title(format!("Completed: {}", completion.subtask.title))
        .body(body)
        .show()
    {
        tracing::debug!("notification failed: {e}");
    }
}

// ── Backend commands ────────────────────────────────────────────────

#[tauri::command]
pub async fn cmd_create_task(
    state: State<'_, DesktopState>,
    title: String,
    description: Option<String>,
) -> Result<Value, String> {
    let task = state
        .backend
        .create_task(&title, description.as_deref())
        .await
        .map_err(|e| e.to_string())?;
    to_value(task)
}

#[tauri::command]
pub async fn cmd_list_tasks_with_active_subtasks(
    state: State<'_, DesktopState>,
    status: Option<TaskStatus>,
) -> Result<Value, String> {
    let tasks = state
        .backend
        .list_tasks_with_active_subtasks(status)
        .await
        .map_err(|e| e.to_string())?;
    to_value(tasks)
}

#[tauri::command]
pub async fn cmd_get_task_with_subtasks_and_sessions(
    state: State<'_, DesktopState>,
    task_id: String,
) -> Result<Value, String> {
    let detail = state
        .backend
        .get_task_with_subtasks_and_sessions(&task_id)
        .await
        .map_err(|e| e.to_string())?;
    to_value(detail)
}

#[tauri::command]
pub async fn cmd_update_task_status(
    state: State<'_, DesktopState>,
    task_id: String,
    status: TaskStatus,
) -> Result<Value, String> {
    let task = state
        .backend
        .update_task_status(&task_id, status)
        .await
        .map_err(|e| e.to_string())?;
    to_value(task)
}

#[tauri::command]
pub async fn cmd_delete_task(state: State<'_, DesktopState>, task_id: String) -> Result<(), String> {
    state.backend.delete_task(&task_id).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn cmd_create_subtask(
    state: State<'_, DesktopState>,
    task_id: String,
    title: String,
    category_id: Option<String>,
) -> Result<Value, String> {
    let subtask = state
        .backend
        .create_subtask(&task_id, &title, category_id.as_deref())
        .await
        .map_err(|e| e.to_string())?;
    to_value(subtask)
}

#[tauri::command]
pub async fn cmd_delete_subtask(
    state: State<'_, DesktopState>,
    subtask_id: String,
) -> Result<(), String> {
    state
        .backend
        .delete_subtask(&subtask_id)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn cmd_start_subtask(
    state: State<'_, DesktopState>,
    subtask_id: String,
) -> Result<Value, String> {
    let session = state
        .backend
        .start_subtask(&subtask_id)
        .await
        .map_err(|e| e.to_string())?;
    to_value(session)
}

#[tauri::command]
pub async fn cmd_pause_subtask(
    state: State<'_, DesktopState>,
    subtask_id: String,
    duration_seconds: u64,
) -> Result<Value, String> {
    let session = state
        .backend
        .pause_subtask(&subtask_id, duration_seconds)
        .await
        .map_err(|e| e.to_string())?;
    to_value(session)
}

#[tauri::command]
pub async fn cmd_resume_subtask(
    state: State<'_, DesktopState>,
    subtask_id: String,
) -> Result<Value, String> {
    let session = state
        .backend
        .resume_subtask(&subtask_id)
        .await
        .map_err(|e| e.to_string())?;
    to_value(session)
}

#[tauri::command]
pub async fn cmd_complete_subtask(
    app: AppHandle,
    state: State<'_, DesktopState>,
    subtask_id: String,
    duration_seconds: u64,
) -> Result<Value, String> {
    let completion = state
        .backend
        .complete_subtask(&subtask_id, duration_seconds)
        .await
        .map_err(|e| e.to_string())?;
    notify_completion(&app, &completion);
    to_value(completion)
}

#[tauri::command]
pub async fn cmd_get_subtask_with_session(
    state: State<'_, DesktopState>,
    subtask_id: String,
) -> Result<Value, String> {
    let (subtask, session) = state
        .backend
        .get_subtask_with_session(&subtask_id)
        .await
        .map_err(|e| e.to_string())?;
    Ok(serde_json::json!({ "subtask": to_value(subtask)?, "session": to_value(session)? }))
}

#[tauri::command]
pub async fn cmd_get_task_metrics(
    state: State<'_, DesktopState>,
    task_id: String,
) -> Result<Value, String> {
    let ledger = state
        .backend
        .get_task_metrics(&task_id)
        .await
        .map_err(|e| e.to_string())?;
    to_value(devfocus_core::TaskMetrics::rollup(&ledger))
}

#[tauri::command]
pub async fn cmd_get_general_metrics(state: State<'_, DesktopState>) -> Result<Value, String> {
    let ledger = state
        .backend
        .get_general_metrics()
        .await
        .map_err(|e| e.to_string())?;
    let today = chrono::Utc::now().date_naive();
    to_value(devfocus_core::GeneralMetrics::rollup(&ledger, today))
}

#[tauri::command]
pub async fn cmd_create_category(
    state: State<'_, DesktopState>,
    name: String,
    color: String,
) -> Result<Value, String> {
    let category = state
        .backend
        .create_category(&name, &color)
        .await
        .map_err(|e| e.to_string())?;
    to_value(category)
}

#[tauri::command]
pub async fn cmd_list_categories(state: State<'_, DesktopState>) -> Result<Value, String> {
    let categories = state
        .backend
        .list_categories()
        .await
        .map_err(|e| e.to_string())?;
    to_value(categories)
}

#[tauri::command]
pub async fn cmd_delete_category(
    state: State<'_, DesktopState>,
    category_id: String,
) -> Result<(), String> {
    state
        .backend
        .delete_category(&category_id)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn cmd_get_category_experience(
    state: State<'_, DesktopState>,
    category_id: String,
) -> Result<Value, String> {
    let experience = state
        .backend
        .get_category_experience(&category_id)
        .await
        .map_err(|e| e.to_string())?;
    to_value(experience)
}

#[tauri::command]
pub async fn cmd_get_all_category_stats(state: State<'_, DesktopState>) -> Result<Value, String> {
    let stats = state
        .backend
        .get_all_category_stats()
        .await
        .map_err(|e| e.to_string())?;
    to_value(stats)
}

#[tauri::command]
pub async fn cmd_get_user_profile(state: State<'_, DesktopState>) -> Result<Value, String> {
    let profile = state
        .backend
        .get_user_profile()
        .await
        .map_err(|e| e.to_string())?;
    let today = chrono::Utc::now().date_naive();
    to_value(devfocus_core::ProfileView::from_profile(&profile, today))
}

// ── Main window ─────────────────────────────────────────────────────

#[tauri::command]
pub fn cmd_main_snapshot(state: State<'_, DesktopState>) -> MainStore {
    state.main.snapshot()
}

#[tauri::command]
pub async fn cmd_main_refresh(state: State<'_, DesktopState>) -> Result<MainStore, String> {
    state.main.refresh().await.map_err(|e| e.to_string())?;
    Ok(state.main.snapshot())
}

#[tauri::command]
pub async fn cmd_main_create_task(
    state: State<'_, DesktopState>,
    title: String,
    description: Option<String>,
) -> Result<MainStore, String> {
    state
        .main
        .create_task(&title, description.as_deref())
        .await
        .map_err(|e| e.to_string())?;
    Ok(state.main.snapshot())
}

#[tauri::command]
pub async fn cmd_main_delete_task(
    state: State<'_, DesktopState>,
    task_id: String,
) -> Result<MainStore, String> {
    state.main.delete_task(&task_id).await.map_err(|e| e.to_string())?;
    Ok(state.main.snapshot())
}

#[tauri::command]
pub async fn cmd_main_open_task(
    state: State<'_, DesktopState>,
    task_id: String,
) -> Result<MainStore, String> {
    state.main.open_task(&task_id).await.map_err(|e| e.to_string())?;
    Ok(state.main.snapshot())
}

#[tauri::command]
pub async fn cmd_main_back(state: State<'_, DesktopState>) -> Result<MainStore, String> {
    state.main.back().await.map_err(|e| e.to_string())?;
    Ok(state.main.snapshot())
}

#[tauri::command]
pub async fn cmd_main_create_subtask(
    state: State<'_, DesktopState>,
    title: String,
    category_id: Option<String>,
) -> Result<MainStore, String> {
    state
        .main
        .create_subtask(&title, category_id.as_deref())
        .await
        .map_err(|e| e.to_string())?;
    Ok(state.main.snapshot())
}

#[tauri::command]
pub async fn cmd_main_delete_subtask(
    state: State<'_, DesktopState>,
    subtask_id: String,
) -> Result<MainStore, String> {
    state
        .main
        .delete_subtask(&subtask_id)
        .await
        .map_err(|e| e.to_string())?;
    Ok(state.main.snapshot())
}

#[tauri::command]
pub async fn cmd_main_start_subtask(
    state: State<'_, DesktopState>,
    subtask_id: String,
) -> Result<MainStore, String> {
    state
        .main
        .start_subtask(&subtask_id)
        .await
        .map_err(|e| e.to_string())?;
    Ok(state.main.snapshot())
}

#[tauri::command]
pub async fn cmd_main_pause_subtask(
    state: State<'_, DesktopState>,
    subtask_id: String,
) -> Result<MainStore, String> {
    state
        .main
        .pause_subtask(&subtask_id)
        .await
        .map_err(|e| e.to_string())?;
    Ok(state.main.snapshot())
}

#[tauri::command]
pub async fn cmd_main_resume_subtask(
    state: State<'_, DesktopState>,
    subtask_id: String,
) -> Result<MainStore, String> {
    state
        .main
        .resume_subtask(&subtask_id)
        .await
        .map_err(|e| e.to_string())?;
    Ok(state.main.snapshot())
}

#[tauri::command]
pub async fn cmd_main_complete_subtask(
    app: AppHandle,
    state: State<'_, DesktopState>,
    subtask_id: String,
) -> Result<MainStore, String> {
    let completion = state
        .main
        .complete_subtask(&subtask_id)
        .await
        .map_err(|e| e.to_string())?;
    notify_completion(&app, &completion);
    Ok(state.main.snapshot())
}

#[tauri::command]
pub fn cmd_open_general_summary(state: State<'_, DesktopState>) -> bool {
    state.main.open_general_summary().is_window()
}

// ── Tracker window ──────────────────────────────────────────────────

#[tauri::command]
pub fn cmd_tracker_snapshot(state: State<'_, DesktopState>) -> Option<TrackerWindowState> {
    state.tracker.snapshot()
}

#[tauri::command]
pub async fn cmd_tracker_toggle(
    state: State<'_, DesktopState>,
) -> Result<Option<TrackerWindowState>, String> {
    state.tracker.toggle().await.map_err(|e| e.to_string())?;
    Ok(state.tracker.snapshot())
}

#[tauri::command]
pub async fn cmd_tracker_done(app: AppHandle, state: State<'_, DesktopState>) -> Result<(), String> {
    let completion = state.tracker.done().await.map_err(|e| e.to_string())?;
    notify_completion(&app, &completion);
    Ok(())
}

// ── Summary windows ─────────────────────────────────────────────────

#[tauri::command]
pub async fn cmd_task_summary_load(
    state: State<'_, DesktopState>,
    task_id: String,
) -> Result<TaskSummaryStore, String> {
    state
        .task_summary
        .load(&task_id)
        .await
        .map_err(|e| e.to_string())?;
    Ok(state.task_summary.snapshot())
}

#[tauri::command]
pub async fn cmd_task_summary_finish(state: State<'_, DesktopState>) -> Result<(), String> {
    state.task_summary.finish().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn cmd_general_summary_refresh(
    state: State<'_, DesktopState>,
) -> Result<GeneralSummaryStore, String> {
    state
        .general_summary
        .refresh()
        .await
        .map_err(|e| e.to_string())?;
    Ok(state.general_summary.snapshot())
}

#[tauri::command]
pub fn cmd_general_summary_close(state: State<'_, DesktopState>) {
    state.general_summary.close();
}

// ── Config commands ─────────────────────────────────────────────────

#[tauri::command]
pub fn cmd_config_get(key: String) -> Result<Value, String> {
    let config = Config::load_or_default();
    match config.get(&key) {
        Some(value) => Ok(Value::String(value)),
        None => Err(format!("unknown key: {key}")),
    }
}

#[tauri::command]
pub fn cmd_config_set(key: String, value: String) -> Result<(), String> {
    let mut config = Config::load_or_default();
    config.set(&key, &value).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn cmd_config_list() -> Result<Value, String> {
    to_value(Config::load_or_default())
}
