//! SQLite-based storage for users, homework, and the notification log.
//!
//! The notification log is append-only: one row per delivered reminder, with
//! a unique index on `(homework_id, sent_on)`. That index is the atomic
//! check-and-record unit that keeps concurrent reminder passes from recording
//! the same item twice on one calendar day.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::homework::{
    Difficulty, Homework, HomeworkStatus, HomeworkUpdate, Importance, NewHomework,
    NotificationRecord, User,
};

const DATE_FMT: &str = "%Y-%m-%d";

// === Helper Functions ===

/// Parse difficulty from a database string.
///
/// Rows are validated at ingestion, so anything unrecognized here came from a
/// hand-edited file; fall back to the default rather than refuse to load.
fn parse_difficulty(s: &str) -> Difficulty {
    match s {
        "low" => Difficulty::Low,
        "high" => Difficulty::High,
        _ => Difficulty::Medium,
    }
}

/// Parse importance from a database string.
fn parse_importance(s: &str) -> Importance {
    match s {
        "low" => Importance::Low,
        "high" => Importance::High,
        _ => Importance::Medium,
    }
}

/// Parse status from a database string.
fn parse_status(s: &str) -> HomeworkStatus {
    match s {
        "complete" => HomeworkStatus::Complete,
        _ => HomeworkStatus::Incomplete,
    }
}

/// Parse a timestamp from an RFC3339 string, falling back to the current time.
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Parse a required calendar date. Unlike timestamps, a due date has no sane
/// fallback, so a corrupt value surfaces as a row error.
fn parse_date_strict(col: usize, s: &str) -> Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(s, DATE_FMT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Build a Homework from a `SELECT *`-ordered row.
fn row_to_homework(row: &rusqlite::Row) -> Result<Homework, rusqlite::Error> {
    let received_date: Option<String> = row.get(4)?;
    let due_date: String = row.get(5)?;
    let difficulty: String = row.get(6)?;
    let importance: String = row.get(7)?;
    let status: String = row.get(8)?;
    let created_at: String = row.get(9)?;
    let updated_at: String = row.get(10)?;

    Ok(Homework {
        id: row.get(0)?,
        user_id: row.get(1)?,
        subject: row.get(2)?,
        task_name: row.get(3)?,
        received_date: received_date
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, DATE_FMT).ok()),
        due_date: parse_date_strict(5, &due_date)?,
        difficulty: parse_difficulty(&difficulty),
        importance: parse_importance(&importance),
        status: parse_status(&status),
        created_at: parse_datetime_fallback(&created_at),
        updated_at: parse_datetime_fallback(&updated_at),
    })
}

fn row_to_user(row: &rusqlite::Row) -> Result<User, rusqlite::Error> {
    let created_at: String = row.get(3)?;
    Ok(User {
        id: row.get(0)?,
        line_user_id: row.get(1)?,
        name: row.get(2)?,
        created_at: parse_datetime_fallback(&created_at),
    })
}

/// Per-user dashboard statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: u64,
    pub completed: u64,
    pub incomplete: u64,
    pub due_today: u64,
    /// Percentage, rounded to the nearest whole number.
    pub completion_rate: u64,
}

/// SQLite database for homework storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at the given path.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
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
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS users (
                id           TEXT PRIMARY KEY,
                line_user_id TEXT UNIQUE,
                name         TEXT NOT NULL,
                created_at   TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS homework (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id       TEXT NOT NULL,
                subject       TEXT NOT NULL,
                task_name     TEXT NOT NULL,
                received_date TEXT,
                due_date      TEXT NOT NULL,
                difficulty    TEXT NOT NULL DEFAULT 'medium',
                importance    TEXT NOT NULL DEFAULT 'medium',
                status        TEXT NOT NULL DEFAULT 'incomplete',
                created_at    TEXT NOT NULL,
                updated_at    TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES users(id)
            );

            CREATE TABLE IF NOT EXISTS notifications (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id     TEXT NOT NULL,
                homework_id INTEGER NOT NULL,
                sent_at     TEXT NOT NULL,
                sent_on     TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES users(id),
                FOREIGN KEY(homework_id) REFERENCES homework(id)
            );

            CREATE INDEX IF NOT EXISTS idx_homework_user_id ON homework(user_id);
            CREATE INDEX IF NOT EXISTS idx_homework_due_date ON homework(due_date);
            CREATE INDEX IF NOT EXISTS idx_homework_status ON homework(status);

            -- At most one notification per homework item per calendar day.
            CREATE UNIQUE INDEX IF NOT EXISTS idx_notifications_homework_day
                ON notifications(homework_id, sent_on);",
        )?;
        Ok(())
    }

    // === Users ===

    /// Insert a user with a fresh opaque id.
    pub fn create_user(
        &self,
        name: &str,
        line_user_id: Option<&str>,
    ) -> Result<User, DatabaseError> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            line_user_id: line_user_id.map(str::to_string),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.conn.execute(
            "INSERT INTO users (id, line_user_id, name, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                user.id,
                user.line_user_id,
                user.name,
                user.created_at.to_rfc3339()
            ],
        )?;
        Ok(user)
    }

    /// Find a user by LINE identity, creating one on first login.
    pub fn get_or_create_user(
        &self,
        line_user_id: &str,
        name: &str,
    ) -> Result<User, DatabaseError> {
        if let Some(user) = self.user_by_line_id(line_user_id)? {
            return Ok(user);
        }
        self.create_user(name, Some(line_user_id))
    }

    pub fn user_by_id(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        let user = self
            .conn
            .query_row(
                "SELECT id, line_user_id, name, created_at FROM users WHERE id = ?1",
                params![id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    pub fn user_by_line_id(&self, line_user_id: &str) -> Result<Option<User>, DatabaseError> {
        let user = self
            .conn
            .query_row(
                "SELECT id, line_user_id, name, created_at FROM users WHERE line_user_id = ?1",
                params![line_user_id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    // === Homework ===

    /// Insert a homework item, returning its sequential id.
    pub fn create_homework(&self, hw: &NewHomework) -> Result<i64, DatabaseError> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO homework
                (user_id, subject, task_name, received_date, due_date,
                 difficulty, importance, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
            params![
                hw.user_id,
                hw.subject,
                hw.task_name,
                hw.received_date.map(|d| d.format(DATE_FMT).to_string()),
                hw.due_date.format(DATE_FMT).to_string(),
                hw.difficulty.as_str(),
                hw.importance.as_str(),
                hw.status.as_str(),
                now,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn homework_by_id(&self, id: i64) -> Result<Option<Homework>, DatabaseError> {
        let hw = self
            .conn
            .query_row(
                "SELECT id, user_id, subject, task_name, received_date, due_date,
                        difficulty, importance, status, created_at, updated_at
                 FROM homework WHERE id = ?1",
                params![id],
                row_to_homework,
            )
            .optional()?;
        Ok(hw)
    }

    /// All homework for one user, newest due date last.
    pub fn homework_for_user(&self, user_id: &str) -> Result<Vec<Homework>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, subject, task_name, received_date, due_date,
                    difficulty, importance, status, created_at, updated_at
             FROM homework WHERE user_id = ?1 ORDER BY due_date ASC",
        )?;
        let rows = stmt.query_map(params![user_id], row_to_homework)?;
        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    /// All incomplete homework across every user, soonest due first. This is
    /// the scheduled reminder pass input.
    pub fn incomplete_homework(&self) -> Result<Vec<Homework>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, subject, task_name, received_date, due_date,
                    difficulty, importance, status, created_at, updated_at
             FROM homework WHERE status = 'incomplete' ORDER BY due_date ASC",
        )?;
        let rows = stmt.query_map([], row_to_homework)?;
        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    /// Up to `limit` soonest-due incomplete items for one user. No horizon
    /// filter: this feeds the on-demand reminder digest.
    pub fn soonest_due_incomplete(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Homework>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, subject, task_name, received_date, due_date,
                    difficulty, importance, status, created_at, updated_at
             FROM homework WHERE user_id = ?1 AND status = 'incomplete'
             ORDER BY due_date ASC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![user_id, limit as i64], row_to_homework)?;
        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    /// Apply a partial update, bumping `updated_at`. Returns false when the
    /// item does not exist.
    pub fn update_homework(&self, id: i64, update: &HomeworkUpdate) -> Result<bool, DatabaseError> {
        if update.is_empty() {
            return Ok(self.homework_by_id(id)?.is_some());
        }

        let mut sets = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(subject) = &update.subject {
            sets.push("subject = ?");
            values.push(Box::new(subject.clone()));
        }
        if let Some(task_name) = &update.task_name {
            sets.push("task_name = ?");
            values.push(Box::new(task_name.clone()));
        }
        if let Some(received) = update.received_date {
            sets.push("received_date = ?");
            values.push(Box::new(received.format(DATE_FMT).to_string()));
        }
        if let Some(due) = update.due_date {
            sets.push("due_date = ?");
            values.push(Box::new(due.format(DATE_FMT).to_string()));
        }
        if let Some(difficulty) = update.difficulty {
            sets.push("difficulty = ?");
            values.push(Box::new(difficulty.as_str()));
        }
        if let Some(importance) = update.importance {
            sets.push("importance = ?");
            values.push(Box::new(importance.as_str()));
        }
        if let Some(status) = update.status {
            sets.push("status = ?");
            values.push(Box::new(status.as_str()));
        }

        sets.push("updated_at = ?");
        values.push(Box::new(Utc::now().to_rfc3339()));
        values.push(Box::new(id));

        let sql = format!(
            "UPDATE homework SET {} WHERE id = ?",
            sets.join(", ")
        );
        let changed = self
            .conn
            .execute(&sql, rusqlite::params_from_iter(values.iter()))?;
        Ok(changed > 0)
    }

    /// Delete a homework item and its notification log entries.
    pub fn delete_homework(&self, id: i64) -> Result<bool, DatabaseError> {
        self.conn.execute(
            "DELETE FROM notifications WHERE homework_id = ?1",
            params![id],
        )?;
        let changed = self
            .conn
            .execute("DELETE FROM homework WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    // === Notification log ===

    /// Append a notification record for a delivered reminder.
    ///
    /// INSERT OR IGNORE against the `(homework_id, sent_on)` unique index:
    /// returns false when a concurrent pass already recorded this item today.
    pub fn record_notification(
        &self,
        user_id: &str,
        homework_id: i64,
        sent_at: DateTime<Utc>,
        sent_on: NaiveDate,
    ) -> Result<bool, DatabaseError> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO notifications (user_id, homework_id, sent_at, sent_on)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                user_id,
                homework_id,
                sent_at.to_rfc3339(),
                sent_on.format(DATE_FMT).to_string()
            ],
        )?;
        Ok(changed > 0)
    }

    /// Whether a reminder for this item was already recorded on `day`.
    pub fn notification_sent_on(
        &self,
        homework_id: i64,
        day: NaiveDate,
    ) -> Result<bool, DatabaseError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM notifications WHERE homework_id = ?1 AND sent_on = ?2",
            params![homework_id, day.format(DATE_FMT).to_string()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Full notification history for one homework item, oldest first.
    pub fn notifications_for_homework(
        &self,
        homework_id: i64,
    ) -> Result<Vec<NotificationRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, homework_id, sent_at, sent_on
             FROM notifications WHERE homework_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![homework_id], |row| {
            let sent_at: String = row.get(3)?;
            let sent_on: String = row.get(4)?;
            Ok(NotificationRecord {
                id: row.get(0)?,
                user_id: row.get(1)?,
                homework_id: row.get(2)?,
                sent_at: parse_datetime_fallback(&sent_at),
                sent_on: parse_date_strict(4, &sent_on)?,
            })
        })?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    // === Dashboard ===

    /// Aggregate completion statistics for one user.
    pub fn dashboard_stats(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<DashboardStats, DatabaseError> {
        let (total, completed): (u64, u64) = self.conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(CASE WHEN status = 'complete' THEN 1 ELSE 0 END), 0)
             FROM homework WHERE user_id = ?1",
            params![user_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let due_today: u64 = self.conn.query_row(
            "SELECT COUNT(*) FROM homework WHERE user_id = ?1 AND due_date = ?2",
            params![user_id, today.format(DATE_FMT).to_string()],
            |row| row.get(0),
        )?;

        let completion_rate = if total > 0 {
            ((completed as f64 / total as f64) * 100.0).round() as u64
        } else {
            0
        };

        Ok(DashboardStats {
            total,
            completed,
            incomplete: total - completed,
            due_today,
            completion_rate,
        })
    }
}
