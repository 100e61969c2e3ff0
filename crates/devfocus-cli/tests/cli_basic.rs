//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own `DEVFOCUS_HOME`.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_devfocus-cli"))
        .env("DEVFOCUS_HOME", home)
        .env("RUST_LOG", "warn")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn run_json(home: &Path, args: &[&str]) -> serde_json::Value {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    let (code, stdout, stderr) = run_cli(home, &full);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("stdout is JSON")
}

fn id_of(value: &serde_json::Value) -> String {
    value["id"].as_str().expect("id").to_string()
}

#[test]
fn test_task_create_and_list() {
    let home = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["task", "create", "Write docs"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Task created:"));

    let tasks = run_json(home.path(), &["task", "list"]);
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Write docs");
    assert_eq!(tasks[0]["subtaskCount"], 0);
}

#[test]
fn test_empty_title_rejected() {
    let home = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["task", "create", "   "]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_subtask_lifecycle() {
    let home = TempDir::new().unwrap();
    let task = run_json(home.path(), &["task", "create", "Ship"]);
    let task_id = id_of(&task);
    let sub = run_json(home.path(), &["subtask", "add", &task_id, "Implement"]);
    let sub_id = id_of(&sub);

    run_json(home.path(), &["subtask", "start", &sub_id]);
    let session = run_json(home.path(), &["subtask", "pause", &sub_id, "--seconds", "90"]);
    assert_eq!(session["durationSeconds"], 90);

    run_json(home.path(), &["subtask", "resume", &sub_id]);
    let done = run_json(home.path(), &["subtask", "done", &sub_id, "--seconds", "120"]);
    assert_eq!(done["pointsEarned"], 15);
    assert_eq!(done["timeSpentSeconds"], 120);
    assert_eq!(done["subtask"]["status"], "done");

    let (code, _, stderr) = run_cli(home.path(), &["subtask", "pause", &sub_id]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));

    let metrics = run_json(home.path(), &["metrics", "task", &task_id]);
    assert_eq!(metrics["totalTimeSeconds"], 120);
    assert_eq!(metrics["subtasksCompleted"], 1);

    let profile = run_json(home.path(), &["profile"]);
    assert_eq!(profile["totalXp"], 120);
    assert_eq!(profile["currentStreak"], 1);
}

#[test]
fn test_task_status_rejects_unknown_value() {
    let home = TempDir::new().unwrap();
    let task = run_json(home.path(), &["task", "create", "Ship"]);
    let (code, _, _) = run_cli(home.path(), &["task", "status", &id_of(&task), "finished"]);
    assert_ne!(code, 0);
}

#[test]
fn test_categories_seeded_and_added() {
    let home = TempDir::new().unwrap();
    let seeded = run_json(home.path(), &["category", "list"]);
    assert_eq!(seeded.as_array().unwrap().len(), 5);

    run_json(home.path(), &["category", "add", "research", "--color", "#123456"]);
    let (code, _, _) = run_cli(home.path(), &["category", "add", "research"]);
    assert_eq!(code, 1, "duplicate name must be rejected");

    let (code, _, _) = run_cli(home.path(), &["category", "add", "ops", "--color", "blue"]);
    assert_eq!(code, 1, "color must be #RRGGBB");
}

#[test]
fn test_general_metrics_window() {
    let home = TempDir::new().unwrap();
    let metrics = run_json(home.path(), &["metrics", "general"]);
    assert_eq!(metrics["pointsLast7Days"].as_array().unwrap().len(), 7);
    assert!(metrics["bestDay"].is_null());
}

#[test]
fn test_config_get_set() {
    let home = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "timer.tick_interval_ms"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "1000");

    let (code, _, _) = run_cli(home.path(), &["config", "set", "backend.timeout_secs", "5"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "backend.timeout_secs"]);
    assert_eq!(stdout.trim(), "5");

    let (code, _, _) = run_cli(home.path(), &["config", "get", "no.such.key"]);
    assert_eq!(code, 1);
}

#[test]
fn test_track_runs_for_duration() {
    let home = TempDir::new().unwrap();
    let task = run_json(home.path(), &["task", "create", "Ship"]);
    let sub = run_json(home.path(), &["subtask", "add", &id_of(&task), "Spike"]);
    let sub_id = id_of(&sub);

    let (code, stdout, stderr) = run_cli(
        home.path(),
        &["track", &sub_id, "--start", "--duration", "1", "--pause-on-exit"],
    );
    assert_eq!(code, 0, "{stderr}");
    assert!(stdout.contains("Spike"));
    assert!(stdout.contains("Paused at"));

    let detail = run_json(home.path(), &["task", "show", &id_of(&task)]);
    assert_eq!(detail["subtasks"][0]["subtask"]["status"], "paused");
}
