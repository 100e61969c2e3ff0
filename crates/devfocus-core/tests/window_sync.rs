//! Main, tracker and summary windows talking through the sync bus.

mod common;

use std::sync::Arc;
use std::time::Duration;

use devfocus_core::backend::Backend;
use devfocus_core::sync::memory::HostCall;
use devfocus_core::sync::{
    Bootstrap, Presentation, SyncEvent, TaskRef, TrackerAction, TrackerLoad, TrackerUpdated,
    WindowLabel, WindowManager,
};
use devfocus_core::views::{MainWindow, TaskSummaryWindow, TrackerWindow};
use devfocus_core::sync::MemoryWindowHost;
use devfocus_core::{BackendError, CoreError, SubtaskStatus};

use common::{SlowBackend, BASE_URL};

fn summary_creations(host: &MemoryWindowHost) -> usize {
    host.created_count(WindowLabel::TaskSummary)
}

#[tokio::test]
async fn scenario_d_done_from_tracker_opens_one_summary() {
    let desktop = common::local_desktop();
    desktop.host.open_external(WindowLabel::Main);
    let main = MainWindow::new(desktop.context());

    let task = main.create_task("Ship login", None).await.unwrap();
    main.open_task(&task.id).await.unwrap();
    let sub = main.create_subtask("Form", None).await.unwrap();
    main.start_subtask(&sub.id).await.unwrap();
    assert!(desktop.host.is_live(WindowLabel::SubtaskTracker));

    // The tracker process completes the subtask on its own.
    let tracker = TrackerWindow::new(desktop.context());
    if let Some(Bootstrap::Tracker(seed)) = desktop
        .host
        .last_spec(WindowLabel::SubtaskTracker)
        .map(|s| s.bootstrap)
    {
        tracker.load(seed);
    }
    let mut main_inbox = desktop.host.subscribe(WindowLabel::Main);
    tracker.done().await.unwrap();

    let event = main_inbox.try_recv().unwrap();
    assert_eq!(
        event,
        SyncEvent::TrackerUpdated(TrackerUpdated {
            action: TrackerAction::Done,
            subtask_id: sub.id.clone(),
        })
    );
    main.handle_event(event.clone()).await.unwrap();

    let store = main.snapshot();
    assert!(store.active.is_none());
    let current = store.current_task.unwrap();
    assert_eq!(current.subtasks[0].subtask.status, SubtaskStatus::Done);
    assert!(!desktop.host.is_live(WindowLabel::SubtaskTracker));
    assert_eq!(summary_creations(&desktop.host), 1);

    // A duplicate `done` must not open another summary.
    main.handle_event(event).await.unwrap();
    assert_eq!(summary_creations(&desktop.host), 1);
    assert!(desktop.host.emitted_to(WindowLabel::TaskSummary).is_empty());
}

#[tokio::test]
async fn summary_waits_for_every_subtask() {
    let desktop = common::local_desktop();
    let main = MainWindow::new(desktop.context());
    let task = main.create_task("Two parts", None).await.unwrap();
    main.open_task(&task.id).await.unwrap();
    let a = main.create_subtask("a", None).await.unwrap();
    let b = main.create_subtask("b", None).await.unwrap();

    main.start_subtask(&a.id).await.unwrap();
    main.complete_subtask(&a.id).await.unwrap();
    assert_eq!(summary_creations(&desktop.host), 0);

    main.start_subtask(&b.id).await.unwrap();
    let completion = main.complete_subtask(&b.id).await.unwrap();
    assert_eq!(completion.points_earned, 15);
    assert_eq!(summary_creations(&desktop.host), 1);
    assert!(main.snapshot().profile.is_some());
}

#[tokio::test]
async fn summary_round_trip_returns_main_to_list() {
    let desktop = common::local_desktop();
    desktop.host.open_external(WindowLabel::Main);
    let main = MainWindow::new(desktop.context());
    let task = main.create_task("Solo", None).await.unwrap();
    main.open_task(&task.id).await.unwrap();
    let sub = main.create_subtask("only", None).await.unwrap();
    main.start_subtask(&sub.id).await.unwrap();
    main.complete_subtask(&sub.id).await.unwrap();

    let summary = TaskSummaryWindow::from_location(
        desktop.context(),
        &format!("index.html?view=task-summary&taskId={}", task.id),
    );
    summary.refresh().await.unwrap();
    assert_eq!(summary.snapshot().metrics.unwrap().subtasks_completed, 1);

    let mut main_inbox = desktop.host.subscribe(WindowLabel::Main);
    summary.finish().await.unwrap();
    assert!(!desktop.host.is_live(WindowLabel::TaskSummary));

    main.handle_event(main_inbox.try_recv().unwrap()).await.unwrap();
    let store = main.snapshot();
    assert!(store.current_task.is_none());
    assert_eq!(store.tasks[0].task.status, devfocus_core::TaskStatus::Done);
}

#[tokio::test]
async fn existing_summary_is_focused_and_reloaded() {
    let desktop = common::local_desktop();
    desktop.host.open_external(WindowLabel::TaskSummary);
    let main = MainWindow::new(desktop.context());
    let task = main.create_task("Solo", None).await.unwrap();
    main.open_task(&task.id).await.unwrap();
    let sub = main.create_subtask("only", None).await.unwrap();
    main.start_subtask(&sub.id).await.unwrap();
    main.complete_subtask(&sub.id).await.unwrap();

    assert_eq!(summary_creations(&desktop.host), 0);
    assert!(desktop
        .host
        .calls()
        .contains(&HostCall::Focus(WindowLabel::TaskSummary)));
    assert_eq!(
        desktop.host.emitted_to(WindowLabel::TaskSummary),
        vec![SyncEvent::SummaryLoad(TaskRef { task_id: task.id })]
    );
}

#[tokio::test]
async fn tracker_update_for_unknown_subtask_is_ignored() {
    let desktop = common::local_desktop();
    let main = MainWindow::new(desktop.context());
    let task = main.create_task("Current", None).await.unwrap();
    main.open_task(&task.id).await.unwrap();
    let before = main.snapshot();

    main.handle_event(SyncEvent::TrackerUpdated(TrackerUpdated {
        action: TrackerAction::Done,
        subtask_id: "from-another-task".into(),
    }))
    .await
    .unwrap();

    let after = main.snapshot();
    assert_eq!(after.current_task, before.current_task);
    assert_eq!(summary_creations(&desktop.host), 0);
    assert!(desktop.host.calls().is_empty());
}

#[tokio::test]
async fn tracker_updates_reach_main_while_showing_the_list() {
    let desktop = common::local_desktop();
    desktop.host.open_external(WindowLabel::Main);
    desktop.host.open_external(WindowLabel::SubtaskTracker);
    let backend = desktop.backend.clone();
    let task = backend.create_task("Listed", None).await.unwrap();
    let sub = backend.create_subtask(&task.id, "only", None).await.unwrap();
    backend.start_subtask(&sub.id).await.unwrap();

    let main = MainWindow::new(desktop.context());
    main.refresh().await.unwrap();
    assert!(main.snapshot().current_task.is_none());

    let tracker = TrackerWindow::new(desktop.context());
    tracker.load(TrackerLoad {
        subtask_id: sub.id.clone(),
        title: "only".into(),
        seconds: 120,
        paused: false,
        category_name: None,
        category_color: None,
    });
    let mut main_inbox = desktop.host.subscribe(WindowLabel::Main);

    tracker.pause().await.unwrap();
    main.handle_event(main_inbox.try_recv().unwrap()).await.unwrap();
    tracker.resume().await.unwrap();
    main.handle_event(main_inbox.try_recv().unwrap()).await.unwrap();
    let listed = &main.snapshot().tasks[0];
    assert_eq!(
        listed.active_subtask.as_ref().map(|a| a.id.as_str()),
        Some(sub.id.as_str())
    );

    tracker.done().await.unwrap();
    main.handle_event(main_inbox.try_recv().unwrap()).await.unwrap();
    let store = main.snapshot();
    assert_eq!(store.tasks[0].completed_subtask_count, 1);
    assert!(store.tasks[0].active_subtask.is_none());
    assert_eq!(store.profile.unwrap().total_xp, 120);
    assert!(!desktop.host.is_live(WindowLabel::SubtaskTracker));
    assert_eq!(summary_creations(&desktop.host), 1);
}

#[tokio::test]
async fn back_closes_tracker_and_reopening_the_task_restores_it() {
    let desktop = common::local_desktop();
    let main = MainWindow::new(desktop.context());
    let task = main.create_task("Resumable", None).await.unwrap();
    main.open_task(&task.id).await.unwrap();
    let sub = main.create_subtask("work", None).await.unwrap();
    main.start_subtask(&sub.id).await.unwrap();
    assert!(desktop.host.is_live(WindowLabel::SubtaskTracker));

    main.back().await.unwrap();
    assert!(!desktop.host.is_live(WindowLabel::SubtaskTracker));
    assert!(desktop
        .host
        .calls()
        .contains(&HostCall::Close(WindowLabel::SubtaskTracker)));

    main.open_task(&task.id).await.unwrap();
    assert!(desktop.host.is_live(WindowLabel::SubtaskTracker));
    assert_eq!(desktop.host.created_count(WindowLabel::SubtaskTracker), 2);
    match desktop
        .host
        .last_spec(WindowLabel::SubtaskTracker)
        .map(|s| s.bootstrap)
    {
        Some(Bootstrap::Tracker(seed)) => {
            assert_eq!(seed.subtask_id, sub.id);
            assert!(!seed.paused);
        }
        other => panic!("unexpected bootstrap {other:?}"),
    }
    assert_eq!(
        main.snapshot().active.map(|a| a.subtask.id),
        Some(sub.id.clone())
    );
}

#[tokio::test(start_paused = true)]
async fn back_discards_in_flight_detail() {
    let desktop = common::Desktop::new(SlowBackend::new());
    let main = MainWindow::new(desktop.context());
    let task = main.create_task("Slow", None).await.unwrap();
    desktop
        .backend
        .delay("getTaskWithSubtasksAndSessions", Duration::from_secs(2));

    let (opened, backed) = tokio::join!(main.open_task(&task.id), async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        main.back().await
    });
    opened.unwrap();
    backed.unwrap();
    assert!(main.snapshot().current_task.is_none());
}

#[tokio::test(start_paused = true)]
async fn tracker_load_beats_in_flight_pause() {
    let desktop = common::Desktop::new(SlowBackend::new());
    let backend = desktop.backend.clone();
    let task = backend.create_task("Race", None).await.unwrap();
    let a = backend.create_subtask(&task.id, "a", None).await.unwrap();
    backend.start_subtask(&a.id).await.unwrap();

    let tracker = Arc::new(TrackerWindow::new(desktop.context()));
    tracker.load(devfocus_core::sync::TrackerLoad {
        subtask_id: a.id.clone(),
        title: "a".into(),
        seconds: 10,
        paused: false,
        category_name: None,
        category_color: None,
    });
    backend.delay("pauseSubtask", Duration::from_secs(2));

    let newer = devfocus_core::sync::TrackerLoad {
        subtask_id: "b".into(),
        title: "b".into(),
        seconds: 77,
        paused: false,
        category_name: None,
        category_color: None,
    };
    let (paused, ()) = tokio::join!(tracker.pause(), async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        tracker.load(newer);
    });
    paused.unwrap();

    let view = tracker.snapshot().unwrap();
    assert_eq!(view.subtask_id, "b");
    assert_eq!(view.seconds, 77);
    assert!(!view.paused);
    let (stored, _) = backend.get_subtask_with_session(&a.id).await.unwrap();
    assert_eq!(stored.status, SubtaskStatus::Paused);
}

#[tokio::test(start_paused = true)]
async fn configured_timeout_surfaces_as_error_indicator() {
    let desktop = common::Desktop::new(SlowBackend::new());
    desktop
        .backend
        .delay("listTasksWithActiveSubtasks", Duration::from_secs(60));
    let main = MainWindow::new(
        desktop
            .context()
            .with_timeout(Some(Duration::from_secs(5))),
    );

    let err = main.refresh_tasks().await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::Backend(BackendError::Timeout { secs: 5, .. })
    ));
    assert!(main.snapshot().error.is_some());
}

#[tokio::test]
async fn window_creation_failure_falls_back_to_browser_tab() {
    let host = MemoryWindowHost::new();
    host.fail_create(WindowLabel::GeneralSummary);
    let windows = WindowManager::new(host.clone(), BASE_URL);

    match windows.get_or_create(Bootstrap::GeneralSummary) {
        Presentation::Fallback { url } => assert_eq!(url, "http://localhost:1420/?view=summary"),
        other => panic!("unexpected {other:?}"),
    }

    host.fail_fallback();
    assert_eq!(
        windows.get_or_create(Bootstrap::GeneralSummary),
        Presentation::Unavailable
    );
}

#[tokio::test]
async fn opening_twice_focuses_instead_of_duplicating() {
    let desktop = common::local_desktop();
    let main = MainWindow::new(desktop.context());
    assert_eq!(main.open_general_summary(), Presentation::Created);
    assert_eq!(main.open_general_summary(), Presentation::Focused);
    assert_eq!(desktop.host.created_count(WindowLabel::GeneralSummary), 1);
}
