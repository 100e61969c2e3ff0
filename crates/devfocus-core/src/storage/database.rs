//! SQLite storage for tasks, subtasks, sessions and scoring state.
//!
//! Provides persistent storage for:
//! - Tasks and their ordered subtasks
//! - Time sessions (one open session per subtask at most)
//! - Categories and per-category experience
//! - The points ledger and the singleton user profile
//! - Key-value store for application state
//!
//! Timestamps are stored as RFC 3339 text, dates as `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::data_dir;
use crate::error::{CoreError, DatabaseError};
use crate::profile::{CategoryExperience, UserProfile};
use crate::session::{SubtaskStatus, TimeSession};
use crate::task::{Category, Subtask, Task, TaskStatus};

const SCHEMA_VERSION: &str = "1";

/// Categories every fresh installation starts with.
const DEFAULT_CATEGORIES: [(&str, &str); 5] = [
    ("frontend", "#3b82f6"),
    ("backend", "#10b981"),
    ("architecture", "#8b5cf6"),
    ("css", "#ec4899"),
    ("tailwind", "#06b6d4"),
];

/// Points earned on one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoints {
    pub date: NaiveDate,
    pub points: u64,
}

/// SQLite database behind the local backend.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data dir>/devfocus.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("devfocus.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open (or create) a database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS tasks (
                id           TEXT PRIMARY KEY,
                title        TEXT NOT NULL,
                description  TEXT,
                status       TEXT NOT NULL,
                created_at   TEXT NOT NULL,
                updated_at   TEXT NOT NULL,
                completed_at TEXT
            );

            CREATE TABLE IF NOT EXISTS categories (
                id         TEXT PRIMARY KEY,
                name       TEXT UNIQUE NOT NULL,
                color      TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS category_experience (
                category_id TEXT PRIMARY KEY,
                total_xp    INTEGER NOT NULL DEFAULT 0,
                updated_at  TEXT NOT NULL,
                FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS subtasks (
                id                 TEXT PRIMARY KEY,
                task_id            TEXT NOT NULL,
                title              TEXT NOT NULL,
                status             TEXT NOT NULL,
                category_id        TEXT,
                total_time_seconds INTEGER NOT NULL DEFAULT 0,
                created_at         TEXT NOT NULL,
                updated_at         TEXT NOT NULL,
                completed_at       TEXT,
                FOREIGN KEY(task_id) REFERENCES tasks(id) ON DELETE CASCADE,
                FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE SET NULL
            );

            CREATE TABLE IF NOT EXISTS time_sessions (
                id               TEXT PRIMARY KEY,
                subtask_id       TEXT NOT NULL,
                started_at       TEXT NOT NULL,
                paused_at        TEXT,
                resumed_at       TEXT,
                ended_at         TEXT,
                duration_seconds INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY(subtask_id) REFERENCES subtasks(id) ON DELETE CASCADE
            );

            -- Ledger rows outlive deleted subtasks so history stays intact.
            CREATE TABLE IF NOT EXISTS points_ledger (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                subtask_id TEXT NOT NULL,
                task_id    TEXT NOT NULL,
                points     INTEGER NOT NULL,
                seconds    INTEGER NOT NULL,
                earned_at  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS user_profile (
                id             INTEGER PRIMARY KEY CHECK (id = 1),
                total_xp       INTEGER NOT NULL DEFAULT 0,
                current_streak INTEGER NOT NULL DEFAULT 0,
                longest_streak INTEGER NOT NULL DEFAULT 0,
                last_work_date TEXT
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_subtasks_task_id ON subtasks(task_id);
            CREATE INDEX IF NOT EXISTS idx_subtasks_category_id ON subtasks(category_id);
            CREATE INDEX IF NOT EXISTS idx_time_sessions_subtask_id ON time_sessions(subtask_id);
            CREATE INDEX IF NOT EXISTS idx_points_ledger_earned_at ON points_ledger(earned_at);
            CREATE INDEX IF NOT EXISTS idx_points_ledger_task_id ON points_ledger(task_id);

            INSERT OR IGNORE INTO user_profile (id) VALUES (1);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        self.seed_default_categories()
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        self.kv_set("schema_version", SCHEMA_VERSION)?;
        Ok(())
    }

    fn seed_default_categories(&self) -> Result<(), rusqlite::Error> {
        if self.kv_get("categories_seeded")?.is_some() {
            return Ok(());
        }
        let now = Utc::now();
        for (name, color) in DEFAULT_CATEGORIES {
            self.conn.execute(
                "INSERT OR IGNORE INTO categories (id, name, color, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![uuid::Uuid::new_v4().to_string(), name, color, stamp(now)],
            )?;
        }
        self.conn.execute(
            "INSERT OR IGNORE INTO category_experience (category_id, total_xp, updated_at)
             SELECT id, 0, ?1 FROM categories",
            params![stamp(now)],
        )?;
        self.kv_set("categories_seeded", "1")?;
        Ok(())
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn insert_task(&self, task: &Task) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO tasks (id, title, description, status, created_at, updated_at, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                task.id,
                task.title,
                task.description,
                task.status.as_str(),
                stamp(task.created_at),
                stamp(task.updated_at),
                task.completed_at.map(stamp),
            ],
        )?;
        Ok(())
    }

    pub fn get_task(&self, id: &str) -> Result<Option<Task>, rusqlite::Error> {
        self.conn
            .query_row(
                "SELECT id, title, description, status, created_at, updated_at, completed_at
                 FROM tasks WHERE id = ?1",
                params![id],
                task_from_row,
            )
            .optional()
    }

    /// Newest first, optionally filtered by status.
    pub fn list_tasks(&self, status: Option<TaskStatus>) -> Result<Vec<Task>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, status, created_at, updated_at, completed_at
             FROM tasks
             WHERE ?1 IS NULL OR status = ?1
             ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt.query_map(params![status.map(|s| s.as_str())], task_from_row)?;
        rows.collect()
    }

    pub fn update_task(&self, task: &Task) -> Result<usize, rusqlite::Error> {
        self.conn.execute(
            "UPDATE tasks SET title = ?2, description = ?3, status = ?4, updated_at = ?5, completed_at = ?6
             WHERE id = ?1",
            params![
                task.id,
                task.title,
                task.description,
                task.status.as_str(),
                stamp(task.updated_at),
                task.completed_at.map(stamp),
            ],
        )
    }

    /// Deletes the task with its subtasks and sessions. Returns rows removed from `tasks`.
    pub fn delete_task(&self, id: &str) -> Result<usize, rusqlite::Error> {
        self.conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])
    }

    // ── Subtasks ─────────────────────────────────────────────────────

    pub fn insert_subtask(&self, subtask: &Subtask) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO subtasks (id, task_id, title, status, category_id, total_time_seconds,
                                   created_at, updated_at, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                subtask.id,
                subtask.task_id,
                subtask.title,
                subtask.status.as_str(),
                subtask.category_id,
                subtask.total_time_seconds,
                stamp(subtask.created_at),
                stamp(subtask.updated_at),
                subtask.completed_at.map(stamp),
            ],
        )?;
        Ok(())
    }

    /// Subtask with its category joined in.
    pub fn get_subtask(&self, id: &str) -> Result<Option<Subtask>, rusqlite::Error> {
        self.conn
            .query_row(
                &format!("{SUBTASK_SELECT} WHERE s.id = ?1"),
                params![id],
                subtask_from_row,
            )
            .optional()
    }

    /// Subtasks of a task in creation order.
    pub fn list_subtasks(&self, task_id: &str) -> Result<Vec<Subtask>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(&format!(
            "{SUBTASK_SELECT} WHERE s.task_id = ?1 ORDER BY s.created_at ASC, s.rowid ASC"
        ))?;
        let rows = stmt.query_map(params![task_id], subtask_from_row)?;
        rows.collect()
    }

    pub fn update_subtask(&self, subtask: &Subtask) -> Result<usize, rusqlite::Error> {
        self.conn.execute(
            "UPDATE subtasks SET title = ?2, status = ?3, category_id = ?4, total_time_seconds = ?5,
                                 updated_at = ?6, completed_at = ?7
             WHERE id = ?1",
            params![
                subtask.id,
                subtask.title,
                subtask.status.as_str(),
                subtask.category_id,
                subtask.total_time_seconds,
                stamp(subtask.updated_at),
                subtask.completed_at.map(stamp),
            ],
        )
    }

    pub fn delete_subtask(&self, id: &str) -> Result<usize, rusqlite::Error> {
        self.conn.execute("DELETE FROM subtasks WHERE id = ?1", params![id])
    }

    // ── Sessions ─────────────────────────────────────────────────────

    pub fn insert_session(&self, session: &TimeSession) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO time_sessions (id, subtask_id, started_at, paused_at, resumed_at, ended_at, duration_seconds)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                session.id,
                session.subtask_id,
                stamp(session.started_at),
                session.paused_at.map(stamp),
                session.resumed_at.map(stamp),
                session.ended_at.map(stamp),
                session.duration_seconds,
            ],
        )?;
        Ok(())
    }

    pub fn update_session(&self, session: &TimeSession) -> Result<usize, rusqlite::Error> {
        self.conn.execute(
            "UPDATE time_sessions SET paused_at = ?2, resumed_at = ?3, ended_at = ?4, duration_seconds = ?5
             WHERE id = ?1",
            params![
                session.id,
                session.paused_at.map(stamp),
                session.resumed_at.map(stamp),
                session.ended_at.map(stamp),
                session.duration_seconds,
            ],
        )
    }

    /// The subtask's non-ended session, if any.
    pub fn open_session(&self, subtask_id: &str) -> Result<Option<TimeSession>, rusqlite::Error> {
        self.conn
            .query_row(
                "SELECT id, subtask_id, started_at, paused_at, resumed_at, ended_at, duration_seconds
                 FROM time_sessions
                 WHERE subtask_id = ?1 AND ended_at IS NULL
                 ORDER BY started_at DESC LIMIT 1",
                params![subtask_id],
                session_from_row,
            )
            .optional()
    }

    pub fn sessions_for_subtask(&self, subtask_id: &str) -> Result<Vec<TimeSession>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, subtask_id, started_at, paused_at, resumed_at, ended_at, duration_seconds
             FROM time_sessions WHERE subtask_id = ?1 ORDER BY started_at ASC",
        )?;
        let rows = stmt.query_map(params![subtask_id], session_from_row)?;
        rows.collect()
    }

    // ── Categories ───────────────────────────────────────────────────

    pub fn insert_category(&self, category: &Category) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO categories (id, name, color, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                category.id,
                category.name,
                category.color,
                stamp(category.created_at)
            ],
        )?;
        self.conn.execute(
            "INSERT OR IGNORE INTO category_experience (category_id, total_xp, updated_at)
             VALUES (?1, 0, ?2)",
            params![category.id, stamp(category.created_at)],
        )?;
        Ok(())
    }

    pub fn get_category(&self, id: &str) -> Result<Option<Category>, rusqlite::Error> {
        self.conn
            .query_row(
                "SELECT id, name, color, created_at FROM categories WHERE id = ?1",
                params![id],
                category_from_row,
            )
            .optional()
    }

    pub fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, rusqlite::Error> {
        self.conn
            .query_row(
                "SELECT id, name, color, created_at FROM categories WHERE name = ?1 COLLATE NOCASE",
                params![name],
                category_from_row,
            )
            .optional()
    }

    pub fn list_categories(&self) -> Result<Vec<Category>, rusqlite::Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, color, created_at FROM categories ORDER BY name ASC")?;
        let rows = stmt.query_map([], category_from_row)?;
        rows.collect()
    }

    /// Subtasks referencing the category keep existing with no category.
    pub fn delete_category(&self, id: &str) -> Result<usize, rusqlite::Error> {
        self.conn.execute("DELETE FROM categories WHERE id = ?1", params![id])
    }

    pub fn category_experience(
        &self,
        category_id: &str,
    ) -> Result<Option<CategoryExperience>, rusqlite::Error> {
        self.conn
            .query_row(
                "SELECT category_id, total_xp, updated_at FROM category_experience WHERE category_id = ?1",
                params![category_id],
                |row| {
                    Ok(CategoryExperience {
                        category_id: row.get(0)?,
                        total_xp: row.get(1)?,
                        updated_at: ts(row, 2)?,
                    })
                },
            )
            .optional()
    }

    pub fn add_category_xp(
        &self,
        category_id: &str,
        xp: u64,
        now: DateTime<Utc>,
    ) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO category_experience (category_id, total_xp, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(category_id) DO UPDATE SET
                 total_xp = MIN(total_xp + ?2, 9223372036854775807), updated_at = ?3",
            params![category_id, xp, stamp(now)],
        )?;
        Ok(())
    }

    /// Done subtasks per category id.
    pub fn completed_subtasks_by_category(&self) -> Result<Vec<(String, u32)>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT category_id, COUNT(*) FROM subtasks
             WHERE status = 'done' AND category_id IS NOT NULL
             GROUP BY category_id",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect()
    }

    // ── Points ledger ────────────────────────────────────────────────

    pub fn record_points(
        &self,
        subtask_id: &str,
        task_id: &str,
        points: u64,
        seconds: u64,
        earned_at: DateTime<Utc>,
    ) -> Result<i64, rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO points_ledger (subtask_id, task_id, points, seconds, earned_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![subtask_id, task_id, points, seconds, stamp(earned_at)],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn points_for_task(&self, task_id: &str) -> Result<u64, rusqlite::Error> {
        self.conn.query_row(
            "SELECT COALESCE(SUM(points), 0) FROM points_ledger WHERE task_id = ?1",
            params![task_id],
            |row| row.get(0),
        )
    }

    /// Ledger totals `(points, entries, seconds)`.
    pub fn ledger_totals(&self) -> Result<(u64, u64, u64), rusqlite::Error> {
        self.conn.query_row(
            "SELECT COALESCE(SUM(points), 0), COUNT(*), COALESCE(SUM(seconds), 0) FROM points_ledger",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
    }

    /// Points per UTC day for days on or after `since`, ascending. Days
    /// without entries are absent.
    pub fn daily_points(&self, since: NaiveDate) -> Result<Vec<DailyPoints>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT substr(earned_at, 1, 10) AS day, SUM(points)
             FROM points_ledger
             WHERE substr(earned_at, 1, 10) >= ?1
             GROUP BY day
             ORDER BY day ASC",
        )?;
        let rows = stmt.query_map(params![since.format("%Y-%m-%d").to_string()], |row| {
            let raw: String = row.get(0)?;
            Ok(DailyPoints {
                date: parse_date(&raw, 0)?,
                points: row.get(1)?,
            })
        })?;
        rows.collect()
    }

    pub fn count_tasks_with_status(&self, status: TaskStatus) -> Result<u64, rusqlite::Error> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE status = ?1",
            params![status.as_str()],
            |row| row.get(0),
        )
    }

    // ── Profile ──────────────────────────────────────────────────────

    pub fn get_profile(&self) -> Result<UserProfile, rusqlite::Error> {
        self.conn.query_row(
            "SELECT total_xp, current_streak, longest_streak, last_work_date FROM user_profile WHERE id = 1",
            [],
            |row| {
                let last: Option<String> = row.get(3)?;
                Ok(UserProfile {
                    total_xp: row.get(0)?,
                    current_streak: row.get(1)?,
                    longest_streak: row.get(2)?,
                    last_work_date: last.map(|d| parse_date(&d, 3)).transpose()?,
                })
            },
        )
    }

    pub fn save_profile(&self, profile: &UserProfile) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "UPDATE user_profile SET total_xp = ?1, current_streak = ?2, longest_streak = ?3, last_work_date = ?4
             WHERE id = 1",
            params![
                profile.total_xp,
                profile.current_streak,
                profile.longest_streak,
                profile.last_work_date.map(|d| d.format("%Y-%m-%d").to_string()),
            ],
        )?;
        Ok(())
    }

    // ── Key-value ────────────────────────────────────────────────────

    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

const SUBTASK_SELECT: &str = "SELECT s.id, s.task_id, s.title, s.status, s.category_id, s.total_time_seconds,
        s.created_at, s.updated_at, s.completed_at, c.name, c.color, c.created_at
 FROM subtasks s LEFT JOIN categories c ON c.id = s.category_id";

/// Fixed-width UTC timestamps so text ordering matches time ordering.
fn stamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

fn ts(row: &Row<'_>, idx: usize) -> Result<DateTime<Utc>, rusqlite::Error> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, format!("bad timestamp '{raw}': {e}")))
}

fn opt_ts(row: &Row<'_>, idx: usize) -> Result<Option<DateTime<Utc>>, rusqlite::Error> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|r| {
        DateTime::parse_from_rfc3339(&r)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| conversion_error(idx, format!("bad timestamp '{r}': {e}")))
    })
    .transpose()
}

fn parse_date(raw: &str, idx: usize) -> Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| conversion_error(idx, format!("bad date '{raw}': {e}")))
}

fn task_from_row(row: &Row<'_>) -> Result<Task, rusqlite::Error> {
    let status: String = row.get(3)?;
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status: status.parse().map_err(|e: String| conversion_error(3, e))?,
        created_at: ts(row, 4)?,
        updated_at: ts(row, 5)?,
        completed_at: opt_ts(row, 6)?,
    })
}

fn subtask_from_row(row: &Row<'_>) -> Result<Subtask, rusqlite::Error> {
    let status: String = row.get(3)?;
    let category_id: Option<String> = row.get(4)?;
    let category_name: Option<String> = row.get(9)?;
    let category = match (&category_id, category_name) {
        (Some(id), Some(name)) => Some(Category {
            id: id.clone(),
            name,
            color: row.get(10)?,
            created_at: ts(row, 11)?,
        }),
        _ => None,
    };
    Ok(Subtask {
        id: row.get(0)?,
        task_id: row.get(1)?,
        title: row.get(2)?,
        status: status
            .parse::<SubtaskStatus>()
            .map_err(|e| conversion_error(3, e))?,
        category_id,
        category,
        total_time_seconds: row.get(5)?,
        created_at: ts(row, 6)?,
        updated_at: ts(row, 7)?,
        completed_at: opt_ts(row, 8)?,
    })
}

fn session_from_row(row: &Row<'_>) -> Result<TimeSession, rusqlite::Error> {
    Ok(TimeSession {
        id: row.get(0)?,
        subtask_id: row.get(1)?,
        started_at: ts(row, 2)?,
        paused_at: opt_ts(row, 3)?,
        resumed_at: opt_ts(row, 4)?,
        ended_at: opt_ts(row, 5)?,
        duration_seconds: row.get(6)?,
    })
}

fn category_from_row(row: &Row<'_>) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        created_at: ts(row, 3)?,
    })
}
