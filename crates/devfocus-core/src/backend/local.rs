//! SQLite-backed [`Backend`].
//!
//! All work happens synchronously under one connection lock, so each command
//! is atomic with respect to every other command in the process.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{
    Backend, SubtaskCompletion, BASE_POINTS, COMPLEXITY_BONUS_POINTS, COMPLEXITY_THRESHOLD,
    EFFICIENCY_BONUS_POINTS,
};
use crate::error::{BackendError, DatabaseError, ValidationError};
use crate::profile::{CategoryExperience, CategoryStats, UserProfile};
use crate::scoring;
use crate::session::{
    displayed_total, SessionStateMachine, SubtaskStatus, TimeSession, MAX_TRACKED_SECONDS,
};
use crate::stats::{GeneralLedger, TaskLedger, EFFICIENT_SESSION_SECONDS, WINDOW_DAYS};
use crate::storage::Database;
use crate::task::{
    validate_color, validate_id, validate_title, ActiveSubtaskInfo, Category, Subtask,
    SubtaskWithSession, Task, TaskStatus, TaskWithActiveSubtask, TaskWithSubtasksAndSessions,
};

/// Source of "now" for the backend.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub struct LocalBackend {
    db: Mutex<Database>,
    clock: Clock,
}

impl LocalBackend {
    pub fn new(db: Database) -> Self {
        Self::with_clock(db, Arc::new(Utc::now))
    }

    pub fn with_clock(db: Database, clock: Clock) -> Self {
        Self {
            db: Mutex::new(db),
            clock,
        }
    }

    /// Backend over the database in the data directory.
    pub fn open() -> Result<Self, crate::error::CoreError> {
        Ok(Self::new(Database::open()?))
    }

    /// Backend over a fresh in-memory database.
    pub fn in_memory() -> Result<Self, DatabaseError> {
        Ok(Self::new(Database::open_memory()?))
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    fn check_seconds(duration_seconds: u64) -> Result<(), ValidationError> {
        if duration_seconds > MAX_TRACKED_SECONDS {
            return Err(ValidationError::InvalidValue {
                field: "durationSeconds".into(),
                message: format!("must be at most {MAX_TRACKED_SECONDS}"),
            });
        }
        Ok(())
    }

    fn db(&self) -> Result<MutexGuard<'_, Database>, BackendError> {
        self.db
            .lock()
            .map_err(|_| BackendError::Storage(DatabaseError::Locked))
    }

    fn subtask(db: &Database, id: &str) -> Result<Subtask, BackendError> {
        db.get_subtask(id)?.ok_or_else(|| BackendError::NotFound {
            entity: "subtask",
            id: id.to_string(),
        })
    }

    fn task(db: &Database, id: &str) -> Result<Task, BackendError> {
        db.get_task(id)?.ok_or_else(|| BackendError::NotFound {
            entity: "task",
            id: id.to_string(),
        })
    }

    /// The subtask's state machine as currently persisted.
    fn machine(db: &Database, subtask_id: &str) -> Result<SessionStateMachine, BackendError> {
        validate_id("subtaskId", subtask_id)?;
        let subtask = Self::subtask(db, subtask_id)?;
        let session = db.open_session(subtask_id)?;
        Ok(SessionStateMachine::new(subtask, session))
    }

    fn category_stats(db: &Database) -> Result<Vec<CategoryStats>, BackendError> {
        let completed = db.completed_subtasks_by_category()?;
        let mut stats = Vec::new();
        for category in db.list_categories()? {
            let xp = db
                .category_experience(&category.id)?
                .map(|e| e.total_xp)
                .unwrap_or(0);
            let done = completed
                .iter()
                .find(|(id, _)| *id == category.id)
                .map(|(_, n)| *n)
                .unwrap_or(0);
            stats.push(CategoryStats::new(
                category.id,
                category.name,
                category.color,
                xp,
                done,
            ));
        }
        Ok(stats)
    }
}

#[async_trait]
impl Backend for LocalBackend {
    async fn create_task(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<Task, BackendError> {
        let title = validate_title("title", title)?;
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        let mut task = Task::new(title, description);
        let now = self.now();
        task.created_at = now;
        task.updated_at = now;
        self.db()?.insert_task(&task)?;
        tracing::info!("created task {}", task.id);
        Ok(task)
    }

    async fn list_tasks_with_active_subtasks(
        &self,
        status: Option<TaskStatus>,
    ) -> Result<Vec<TaskWithActiveSubtask>, BackendError> {
        let now = self.now();
        let db = self.db()?;
        let mut out = Vec::new();
        for task in db.list_tasks(status)? {
            let subtasks = db.list_subtasks(&task.id)?;
            let active = match subtasks
                .iter()
                .find(|s| s.status == SubtaskStatus::InProgress)
            {
                Some(s) => {
                    let session = db.open_session(&s.id)?;
                    Some(ActiveSubtaskInfo {
                        id: s.id.clone(),
                        title: s.title.clone(),
                        total_time_seconds: s.total_time_seconds,
                        current_session_time: displayed_total(s, session.as_ref(), now),
                    })
                }
                None => None,
            };
            out.push(TaskWithActiveSubtask {
                subtask_count: subtasks.len() as u32,
                completed_subtask_count: subtasks.iter().filter(|s| s.is_done()).count() as u32,
                active_subtask: active,
                task,
            });
        }
        Ok(out)
    }

    async fn get_task_with_subtasks_and_sessions(
        &self,
        task_id: &str,
    ) -> Result<TaskWithSubtasksAndSessions, BackendError> {
        validate_id("taskId", task_id)?;
        let db = self.db()?;
        let task = Self::task(&db, task_id)?;
        let mut subtasks = Vec::new();
        for subtask in db.list_subtasks(task_id)? {
            let session = db.open_session(&subtask.id)?;
            subtasks.push(SubtaskWithSession { subtask, session });
        }
        Ok(TaskWithSubtasksAndSessions { task, subtasks })
    }

    async fn update_task_status(
        &self,
        task_id: &str,
        status: TaskStatus,
    ) -> Result<Task, BackendError> {
        validate_id("taskId", task_id)?;
        let now = self.now();
        let db = self.db()?;
        let mut task = Self::task(&db, task_id)?;
        task.set_status(status, now);
        db.update_task(&task)?;
        Ok(task)
    }

    async fn delete_task(&self, task_id: &str) -> Result<(), BackendError> {
        validate_id("taskId", task_id)?;
        if self.db()?.delete_task(task_id)? == 0 {
            return Err(BackendError::NotFound {
                entity: "task",
                id: task_id.to_string(),
            });
        }
        tracing::info!("deleted task {task_id}");
        Ok(())
    }

    async fn create_subtask(
        &self,
        task_id: &str,
        title: &str,
        category_id: Option<&str>,
    ) -> Result<Subtask, BackendError> {
        validate_id("taskId", task_id)?;
        let title = validate_title("title", title)?;
        let now = self.now();
        let db = self.db()?;
        Self::task(&db, task_id)?;
        let category = match category_id.filter(|c| !c.trim().is_empty()) {
            Some(id) => Some(db.get_category(id)?.ok_or_else(|| BackendError::NotFound {
                entity: "category",
                id: id.to_string(),
            })?),
            None => None,
        };

        let mut subtask = Subtask::new(task_id, title);
        subtask.created_at = now;
        subtask.updated_at = now;
        subtask.category_id = category.as_ref().map(|c| c.id.clone());
        subtask.category = category;
        db.insert_subtask(&subtask)?;
        Ok(subtask)
    }

    async fn delete_subtask(&self, subtask_id: &str) -> Result<(), BackendError> {
        validate_id("subtaskId", subtask_id)?;
        if self.db()?.delete_subtask(subtask_id)? == 0 {
            return Err(BackendError::NotFound {
                entity: "subtask",
                id: subtask_id.to_string(),
            });
        }
        Ok(())
    }

    async fn start_subtask(&self, subtask_id: &str) -> Result<TimeSession, BackendError> {
        let now = self.now();
        let db = self.db()?;
        let mut machine = Self::machine(&db, subtask_id)?;
        let session = machine.start(now)?.clone();

        let tx = db.conn().unchecked_transaction()?;
        db.insert_session(&session)?;
        db.update_subtask(&machine.subtask)?;
        let mut task = Self::task(&db, &machine.subtask.task_id)?;
        if task.status == TaskStatus::Todo {
            task.set_status(TaskStatus::InProgress, now);
            db.update_task(&task)?;
        }
        tx.commit()?;
        tracing::info!("started subtask {subtask_id}");
        Ok(session)
    }

    async fn pause_subtask(
        &self,
        subtask_id: &str,
        duration_seconds: u64,
    ) -> Result<TimeSession, BackendError> {
        Self::check_seconds(duration_seconds)?;
        let now = self.now();
        let db = self.db()?;
        let mut machine = Self::machine(&db, subtask_id)?;
        let session = machine.pause(duration_seconds, now)?.clone();

        let tx = db.conn().unchecked_transaction()?;
        db.update_session(&session)?;
        db.update_subtask(&machine.subtask)?;
        tx.commit()?;
        tracing::info!("paused subtask {subtask_id} at {duration_seconds}s");
        Ok(session)
    }

    async fn resume_subtask(&self, subtask_id: &str) -> Result<TimeSession, BackendError> {
        let now = self.now();
        let db = self.db()?;
        let mut machine = Self::machine(&db, subtask_id)?;
        let session = machine.resume(now)?.clone();

        let tx = db.conn().unchecked_transaction()?;
        db.update_session(&session)?;
        db.update_subtask(&machine.subtask)?;
        tx.commit()?;
        tracing::info!("resumed subtask {subtask_id}");
        Ok(session)
    }

    async fn complete_subtask(
        &self,
        subtask_id: &str,
        duration_seconds: u64,
    ) -> Result<SubtaskCompletion, BackendError> {
        Self::check_seconds(duration_seconds)?;
        let now = self.now();
        let db = self.db()?;
        let mut machine = Self::machine(&db, subtask_id)?;
        let closed = machine.complete(duration_seconds, now)?;
        let subtask = machine.subtask;

        let points = BASE_POINTS
            + if duration_seconds < EFFICIENT_SESSION_SECONDS {
                EFFICIENCY_BONUS_POINTS
            } else {
                0
            };

        let tx = db.conn().unchecked_transaction()?;
        db.update_session(&closed)?;
        db.update_subtask(&subtask)?;
        db.record_points(&subtask.id, &subtask.task_id, points, duration_seconds, now)?;

        let mut profile = db.get_profile()?;
        profile.record_work_day(now.date_naive());
        let bonus = scoring::streak_bonus_percentage(profile.current_streak);
        let xp = scoring::xp_for_session(duration_seconds, bonus).min(MAX_TRACKED_SECONDS);
        profile.total_xp = profile.total_xp.saturating_add(xp).min(MAX_TRACKED_SECONDS);
        db.save_profile(&profile)?;

        if let Some(category_id) = &subtask.category_id {
            db.add_category_xp(category_id, xp, now)?;
        }
        tx.commit()?;

        tracing::info!(
            "completed subtask {subtask_id}: {duration_seconds}s, {points} points, {xp} xp (+{bonus}%)"
        );
        Ok(SubtaskCompletion {
            category: subtask.category.clone(),
            subtask,
            points_earned: points,
            time_spent_seconds: duration_seconds,
            xp_gained: xp,
            streak_bonus_percentage: bonus,
        })
    }

    async fn get_subtask_with_session(
        &self,
        subtask_id: &str,
    ) -> Result<(Subtask, Option<TimeSession>), BackendError> {
        validate_id("subtaskId", subtask_id)?;
        let db = self.db()?;
        let subtask = Self::subtask(&db, subtask_id)?;
        let session = db.open_session(subtask_id)?;
        Ok((subtask, session))
    }

    async fn get_task_metrics(&self, task_id: &str) -> Result<TaskLedger, BackendError> {
        validate_id("taskId", task_id)?;
        let db = self.db()?;
        let task = Self::task(&db, task_id)?;
        let subtasks = db.list_subtasks(task_id)?;

        let done: Vec<&Subtask> = subtasks.iter().filter(|s| s.is_done()).collect();
        let efficient = done
            .iter()
            .filter(|s| s.total_time_seconds < EFFICIENT_SESSION_SECONDS)
            .count();
        let efficiency_rate = if done.is_empty() {
            0.0
        } else {
            efficient as f64 / done.len() as f64 * 100.0
        };

        let mut total_points = db.points_for_task(task_id)?;
        if subtasks.len() >= COMPLEXITY_THRESHOLD {
            total_points += COMPLEXITY_BONUS_POINTS;
        }

        Ok(TaskLedger {
            task,
            subtasks,
            total_points,
            efficiency_rate,
        })
    }

    async fn get_general_metrics(&self) -> Result<GeneralLedger, BackendError> {
        let today = self.now().date_naive();
        let db = self.db()?;
        let (total_points, entries, seconds) = db.ledger_totals()?;
        let daily_points = db.daily_points(today - Duration::days(WINDOW_DAYS - 1))?;
        Ok(GeneralLedger {
            total_points,
            total_time_seconds: seconds,
            tasks_completed: db.count_tasks_with_status(TaskStatus::Done)?,
            subtasks_completed: entries,
            daily_points,
            category_stats: Self::category_stats(&db)?,
        })
    }

    async fn create_category(&self, name: &str, color: &str) -> Result<Category, BackendError> {
        let name = validate_title("name", name)?;
        let color = validate_color(color)?;
        let db = self.db()?;
        if db.find_category_by_name(&name)?.is_some() {
            return Err(ValidationError::InvalidValue {
                field: "name".into(),
                message: format!("category '{name}' already exists"),
            }
            .into());
        }
        let mut category = Category::new(name, color);
        category.created_at = self.now();
        db.insert_category(&category)?;
        Ok(category)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, BackendError> {
        Ok(self.db()?.list_categories()?)
    }

    async fn delete_category(&self, category_id: &str) -> Result<(), BackendError> {
        validate_id("categoryId", category_id)?;
        if self.db()?.delete_category(category_id)? == 0 {
            return Err(BackendError::NotFound {
                entity: "category",
                id: category_id.to_string(),
            });
        }
        Ok(())
    }

    async fn get_category_experience(
        &self,
        category_id: &str,
    ) -> Result<CategoryExperience, BackendError> {
        validate_id("categoryId", category_id)?;
        self.db()?
            .category_experience(category_id)?
            .ok_or_else(|| BackendError::NotFound {
                entity: "category",
                id: category_id.to_string(),
            })
    }

    async fn get_all_category_stats(&self) -> Result<Vec<CategoryStats>, BackendError> {
        let db = self.db()?;
        Self::category_stats(&db)
    }

    async fn get_user_profile(&self) -> Result<UserProfile, BackendError> {
        Ok(self.db()?.get_profile()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransitionError;
    use crate::session::SessionAction;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Backend whose clock starts at a fixed instant and moves only when told.
    fn backend() -> (LocalBackend, Arc<AtomicI64>) {
        let base = DateTime::parse_from_rfc3339("2024-06-10T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let offset = Arc::new(AtomicI64::new(0));
        let o = offset.clone();
        let clock: Clock = Arc::new(move || base + Duration::seconds(o.load(Ordering::SeqCst)));
        (
            LocalBackend::with_clock(Database::open_memory().unwrap(), clock),
            offset,
        )
    }

    async fn task_with_subtask(b: &LocalBackend) -> (Task, Subtask) {
        let task = b.create_task("Release 1.0", None).await.unwrap();
        let sub = b.create_subtask(&task.id, "Changelog", None).await.unwrap();
        (task, sub)
    }

    #[tokio::test]
    async fn create_task_validates_title() {
        let (b, _) = backend();
        let err = b.create_task("   ", None).await.unwrap_err();
        assert!(matches!(
            err,
            BackendError::Invalid(ValidationError::EmptyTitle { field: "title" })
        ));
        let task = b.create_task("  Ship  ", Some("")).await.unwrap();
        assert_eq!(task.title, "Ship");
        assert!(task.description.is_none());
    }

    #[tokio::test]
    async fn start_moves_task_in_progress() {
        let (b, _) = backend();
        let (task, sub) = task_with_subtask(&b).await;
        let session = b.start_subtask(&sub.id).await.unwrap();
        assert_eq!(session.duration_seconds, 0);

        let detail = b.get_task_with_subtasks_and_sessions(&task.id).await.unwrap();
        assert_eq!(detail.task.status, TaskStatus::InProgress);
        assert_eq!(detail.subtasks[0].subtask.status, SubtaskStatus::InProgress);
        assert_eq!(detail.subtasks[0].session.as_ref(), Some(&session));
    }

    #[tokio::test]
    async fn illegal_transition_is_rejected() {
        let (b, _) = backend();
        let (_, sub) = task_with_subtask(&b).await;
        let err = b.pause_subtask(&sub.id, 10).await.unwrap_err();
        match err {
            BackendError::Rejected(TransitionError { from, action, .. }) => {
                assert_eq!(from, SubtaskStatus::Todo);
                assert_eq!(action, SessionAction::Pause);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn pause_resume_keeps_committed_duration() {
        let (b, clock) = backend();
        let (_, sub) = task_with_subtask(&b).await;
        b.start_subtask(&sub.id).await.unwrap();
        clock.store(90, Ordering::SeqCst);
        let paused = b.pause_subtask(&sub.id, 90).await.unwrap();
        assert_eq!(paused.duration_seconds, 90);
        assert!(paused.paused_at.is_some());

        clock.store(400, Ordering::SeqCst);
        let resumed = b.resume_subtask(&sub.id).await.unwrap();
        assert_eq!(resumed.duration_seconds, 90);
        assert_eq!(resumed.id, paused.id);

        clock.store(430, Ordering::SeqCst);
        let list = b.list_tasks_with_active_subtasks(None).await.unwrap();
        let active = list[0].active_subtask.as_ref().unwrap();
        assert_eq!(active.current_session_time, 120);
    }

    #[tokio::test]
    async fn unstorable_durations_are_rejected() {
        let (b, _) = backend();
        let (_, sub) = task_with_subtask(&b).await;
        b.start_subtask(&sub.id).await.unwrap();

        let err = b.pause_subtask(&sub.id, u64::MAX).await.unwrap_err();
        assert!(matches!(
            err,
            BackendError::Invalid(ValidationError::InvalidValue { .. })
        ));
        let err = b.complete_subtask(&sub.id, u64::MAX / 50).await.unwrap_err();
        assert!(matches!(
            err,
            BackendError::Invalid(ValidationError::InvalidValue { .. })
        ));
        let (still, _) = b.get_subtask_with_session(&sub.id).await.unwrap();
        assert_eq!(still.status, SubtaskStatus::InProgress);

        let done = b.complete_subtask(&sub.id, MAX_TRACKED_SECONDS).await.unwrap();
        assert_eq!(done.subtask.total_time_seconds, MAX_TRACKED_SECONDS);
        assert!(done.xp_gained >= MAX_TRACKED_SECONDS);
        let profile = b.get_user_profile().await.unwrap();
        assert!(profile.total_xp <= MAX_TRACKED_SECONDS);
    }

    #[tokio::test]
    async fn complete_awards_points_xp_and_streak() {
        let (b, _) = backend();
        let task = b.create_task("T", None).await.unwrap();
        let categories = b.list_categories().await.unwrap();
        let backend_cat = categories.iter().find(|c| c.name == "backend").unwrap();
        let sub = b
            .create_subtask(&task.id, "API", Some(&backend_cat.id))
            .await
            .unwrap();
        b.start_subtask(&sub.id).await.unwrap();

        let done = b.complete_subtask(&sub.id, 600).await.unwrap();
        assert_eq!(done.points_earned, 15);
        assert_eq!(done.xp_gained, 600);
        assert_eq!(done.streak_bonus_percentage, 0);
        assert_eq!(done.subtask.status, SubtaskStatus::Done);
        assert_eq!(done.subtask.total_time_seconds, 600);
        assert_eq!(done.category.as_ref().map(|c| c.name.as_str()), Some("backend"));

        let profile = b.get_user_profile().await.unwrap();
        assert_eq!(profile.total_xp, 600);
        assert_eq!(profile.current_streak, 1);
        let exp = b.get_category_experience(&backend_cat.id).await.unwrap();
        assert_eq!(exp.total_xp, 600);

        let (reloaded, session) = b.get_subtask_with_session(&sub.id).await.unwrap();
        assert!(reloaded.completed_at.is_some());
        assert!(session.is_none());
    }

    #[tokio::test]
    async fn long_session_gets_base_points_only() {
        let (b, _) = backend();
        let (_, sub) = task_with_subtask(&b).await;
        b.start_subtask(&sub.id).await.unwrap();
        assert_eq!(b.complete_subtask(&sub.id, 1500).await.unwrap().points_earned, 10);
    }

    #[tokio::test]
    async fn completed_subtask_rejects_late_pause() {
        let (b, _) = backend();
        let (_, sub) = task_with_subtask(&b).await;
        b.start_subtask(&sub.id).await.unwrap();
        b.complete_subtask(&sub.id, 30).await.unwrap();
        assert!(matches!(
            b.pause_subtask(&sub.id, 31).await,
            Err(BackendError::Rejected(_))
        ));
        let (s, _) = b.get_subtask_with_session(&sub.id).await.unwrap();
        assert_eq!(s.total_time_seconds, 30);
    }

    #[tokio::test]
    async fn streak_bonus_applies_after_a_week() {
        let (b, clock) = backend();
        let task = b.create_task("Daily", None).await.unwrap();
        let mut last = None;
        for day in 0..7 {
            clock.store(day * 86_400, Ordering::SeqCst);
            let sub = b
                .create_subtask(&task.id, &format!("day {day}"), None)
                .await
                .unwrap();
            b.start_subtask(&sub.id).await.unwrap();
            last = Some(b.complete_subtask(&sub.id, 100).await.unwrap());
        }
        let last = last.unwrap();
        assert_eq!(last.streak_bonus_percentage, 5);
        assert_eq!(last.xp_gained, 105);
        let profile = b.get_user_profile().await.unwrap();
        assert_eq!(profile.current_streak, 7);
        assert_eq!(profile.longest_streak, 7);
    }

    #[tokio::test]
    async fn task_metrics_bonus_and_efficiency() {
        let (b, _) = backend();
        let task = b.create_task("Big", None).await.unwrap();
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(b.create_subtask(&task.id, &format!("s{i}"), None).await.unwrap().id);
        }
        for (id, secs) in ids.iter().zip([600, 2000]) {
            b.start_subtask(id).await.unwrap();
            b.complete_subtask(id, secs).await.unwrap();
        }
        let ledger = b.get_task_metrics(&task.id).await.unwrap();
        assert_eq!(ledger.total_points, 15 + 10 + 20);
        assert_eq!(ledger.efficiency_rate, 50.0);
        assert_eq!(ledger.subtasks.len(), 5);
    }

    #[tokio::test]
    async fn general_metrics_reads_ledger() {
        let (b, _) = backend();
        let (task, sub) = task_with_subtask(&b).await;
        b.start_subtask(&sub.id).await.unwrap();
        b.complete_subtask(&sub.id, 1200).await.unwrap();
        b.update_task_status(&task.id, TaskStatus::Done).await.unwrap();

        let ledger = b.get_general_metrics().await.unwrap();
        assert_eq!(ledger.total_points, 15);
        assert_eq!(ledger.total_time_seconds, 1200);
        assert_eq!(ledger.tasks_completed, 1);
        assert_eq!(ledger.subtasks_completed, 1);
        assert_eq!(ledger.daily_points.len(), 1);
        assert_eq!(ledger.category_stats.len(), 5);
    }

    #[tokio::test]
    async fn category_crud() {
        let (b, _) = backend();
        let c = b.create_category("Infra", "#FF8800").await.unwrap();
        assert_eq!(c.color, "#ff8800");
        assert!(b.create_category("infra", "#000000").await.is_err());
        assert!(b.create_category("Ops", "orange").await.is_err());
        b.delete_category(&c.id).await.unwrap();
        assert!(matches!(
            b.delete_category(&c.id).await,
            Err(BackendError::NotFound { entity: "category", .. })
        ));
    }

    #[tokio::test]
    async fn missing_ids() {
        let (b, _) = backend();
        assert!(matches!(
            b.start_subtask("").await,
            Err(BackendError::Invalid(ValidationError::MissingId { .. }))
        ));
        assert!(matches!(
            b.get_task_with_subtasks_and_sessions("nope").await,
            Err(BackendError::NotFound { entity: "task", .. })
        ));
        assert!(b.create_subtask("nope", "x", None).await.is_err());
        assert!(b.delete_subtask("nope").await.is_err());
    }
}
