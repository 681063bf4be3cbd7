//! Homework domain types.
//!
//! Difficulty and importance are closed three-valued enums. Free-form strings
//! are rejected at ingestion via `FromStr`; once a value is inside the system
//! an unrecognized weight is unrepresentable.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// How hard the homework is expected to be.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Low,
    Medium,
    High,
}

impl Difficulty {
    /// Scoring weight: low=1, medium=2, high=3.
    pub fn weight(self) -> i64 {
        match self {
            Difficulty::Low => 1,
            Difficulty::Medium => 2,
            Difficulty::High => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Low => "low",
            Difficulty::Medium => "medium",
            Difficulty::High => "high",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Difficulty::Low),
            "medium" => Ok(Difficulty::Medium),
            "high" => Ok(Difficulty::High),
            other => Err(ValidationError::InvalidValue {
                field: "difficulty",
                message: format!("expected low/medium/high, got '{other}'"),
            }),
        }
    }
}

/// How much the homework matters to the student.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    Medium,
    High,
}

impl Importance {
    /// Scoring weight: low=1, medium=2, high=3.
    pub fn weight(self) -> i64 {
        match self {
            Importance::Low => 1,
            Importance::Medium => 2,
            Importance::High => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Importance::Low => "low",
            Importance::Medium => "medium",
            Importance::High => "high",
        }
    }
}

impl Default for Importance {
    fn default() -> Self {
        Importance::Medium
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Importance {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Importance::Low),
            "medium" => Ok(Importance::Medium),
            "high" => Ok(Importance::High),
            other => Err(ValidationError::InvalidValue {
                field: "importance",
                message: format!("expected low/medium/high, got '{other}'"),
            }),
        }
    }
}

/// Completion status of a homework item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HomeworkStatus {
    Incomplete,
    Complete,
}

impl HomeworkStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            HomeworkStatus::Incomplete => "incomplete",
            HomeworkStatus::Complete => "complete",
        }
    }
}

impl Default for HomeworkStatus {
    fn default() -> Self {
        HomeworkStatus::Incomplete
    }
}

impl FromStr for HomeworkStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incomplete" => Ok(HomeworkStatus::Incomplete),
            "complete" => Ok(HomeworkStatus::Complete),
            other => Err(ValidationError::InvalidValue {
                field: "status",
                message: format!("expected incomplete/complete, got '{other}'"),
            }),
        }
    }
}

/// A registered student.
///
/// Created on first login; the LINE identity is unique and never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub line_user_id: Option<String>,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A homework item, as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Homework {
    pub id: i64,
    pub user_id: String,
    pub subject: String,
    pub task_name: String,
    pub received_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub difficulty: Difficulty,
    pub importance: Importance,
    pub status: HomeworkStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a homework item.
#[derive(Debug, Clone)]
pub struct NewHomework {
    pub user_id: String,
    pub subject: String,
    pub task_name: String,
    pub received_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub difficulty: Difficulty,
    pub importance: Importance,
    pub status: HomeworkStatus,
}

impl NewHomework {
    /// Reject malformed payloads before anything is stored or scored.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::MissingField("userId"));
        }
        if self.subject.trim().is_empty() {
            return Err(ValidationError::MissingField("subject"));
        }
        if self.task_name.trim().is_empty() {
            return Err(ValidationError::MissingField("taskName"));
        }
        Ok(())
    }
}

/// Partial update for a homework item. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct HomeworkUpdate {
    pub subject: Option<String>,
    pub task_name: Option<String>,
    pub received_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub difficulty: Option<Difficulty>,
    pub importance: Option<Importance>,
    pub status: Option<HomeworkStatus>,
}

impl HomeworkUpdate {
    pub fn is_empty(&self) -> bool {
        self.subject.is_none()
            && self.task_name.is_none()
            && self.received_date.is_none()
            && self.due_date.is_none()
            && self.difficulty.is_none()
            && self.importance.is_none()
            && self.status.is_none()
    }
}

/// An immutable log entry for a delivered reminder.
///
/// `sent_on` is the calendar-date half of the dedup key; the storage layer
/// enforces at most one row per `(homework_id, sent_on)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: i64,
    pub user_id: String,
    pub homework_id: i64,
    pub sent_at: DateTime<Utc>,
    pub sent_on: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_are_fixed() {
        assert_eq!(Difficulty::Low.weight(), 1);
        assert_eq!(Difficulty::Medium.weight(), 2);
        assert_eq!(Difficulty::High.weight(), 3);
        assert_eq!(Importance::Low.weight(), 1);
        assert_eq!(Importance::High.weight(), 3);
    }

    #[test]
    fn difficulty_rejects_unknown_values() {
        assert!("medium".parse::<Difficulty>().is_ok());
        assert!("extreme".parse::<Difficulty>().is_err());
        assert!("".parse::<Importance>().is_err());
        // Case-sensitive on purpose: values are normalized by the caller.
        assert!("High".parse::<Difficulty>().is_err());
    }

    #[test]
    fn new_homework_requires_subject_and_task() {
        let hw = NewHomework {
            user_id: "u1".into(),
            subject: "".into(),
            task_name: "Worksheet".into(),
            received_date: None,
            due_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            difficulty: Difficulty::default(),
            importance: Importance::default(),
            status: HomeworkStatus::default(),
        };
        assert!(hw.validate().is_err());

        let hw = NewHomework {
            subject: "Math".into(),
            ..hw
        };
        assert!(hw.validate().is_ok());

        let hw = NewHomework {
            task_name: "  ".into(),
            ..hw
        };
        assert!(hw.validate().is_err());
    }
}
