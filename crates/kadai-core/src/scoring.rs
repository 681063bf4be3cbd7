//! Priority scoring engine for homework items.
//!
//! Turns a due date plus difficulty/importance into a deterministic ranking:
//!
//! ```text
//! priority = (10 - max(0, days_left)) + difficulty_weight + importance_weight
//! ```
//!
//! `days_left` is a calendar-date difference, so any clock time on the due
//! date itself yields 0 and fractional days never lower the count. The
//! `max(0, ..)` clamp keeps overdue items at the same base as due-today items
//! instead of growing without bound.
//!
//! The formula and the urgency thresholds are fixed at compile time. They are
//! not tunable at runtime.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::homework::{Difficulty, Homework, Importance};

/// Base contribution of an item due today (or overdue).
const DUE_NOW_BASE: i64 = 10;

/// Urgency tier derived from days remaining.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Due within 2 days (or overdue).
    Critical,
    /// Due within 5 days.
    Warning,
    /// Everything further out.
    Normal,
}

impl Urgency {
    /// Step function over days remaining, inclusive on the lower side.
    pub fn from_days_left(days_left: i64) -> Self {
        if days_left <= 2 {
            Urgency::Critical
        } else if days_left <= 5 {
            Urgency::Warning
        } else {
            Urgency::Normal
        }
    }
}

/// Whole days between today and the due date. Negative when overdue.
pub fn days_left(due_date: NaiveDate, today: NaiveDate) -> i64 {
    (due_date - today).num_days()
}

/// Composite priority score; higher sorts first on the dashboard.
pub fn priority_score(days_left: i64, difficulty: Difficulty, importance: Importance) -> i64 {
    (DUE_NOW_BASE - days_left.max(0)) + difficulty.weight() + importance.weight()
}

/// Derived, never-persisted view of one homework item at a point in time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scorecard {
    pub days_left: i64,
    pub priority_score: i64,
    pub urgency: Urgency,
}

impl Scorecard {
    pub fn evaluate(homework: &Homework, today: NaiveDate) -> Self {
        let days_left = days_left(homework.due_date, today);
        Self {
            days_left,
            priority_score: priority_score(days_left, homework.difficulty, homework.importance),
            urgency: Urgency::from_days_left(days_left),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn due_today_is_zero_days_and_critical() {
        let today = date(2025, 6, 10);
        assert_eq!(days_left(today, today), 0);
        assert_eq!(Urgency::from_days_left(0), Urgency::Critical);
    }

    #[test]
    fn overdue_days_are_negative() {
        assert_eq!(days_left(date(2025, 6, 8), date(2025, 6, 10)), -2);
    }

    #[test]
    fn urgency_thresholds_are_inclusive() {
        assert_eq!(Urgency::from_days_left(-3), Urgency::Critical);
        assert_eq!(Urgency::from_days_left(2), Urgency::Critical);
        assert_eq!(Urgency::from_days_left(3), Urgency::Warning);
        assert_eq!(Urgency::from_days_left(5), Urgency::Warning);
        assert_eq!(Urgency::from_days_left(6), Urgency::Normal);
        assert_eq!(Urgency::from_days_left(10), Urgency::Normal);
    }

    #[test]
    fn high_high_due_today_scores_sixteen() {
        assert_eq!(priority_score(0, Difficulty::High, Importance::High), 16);
    }

    #[test]
    fn medium_low_three_days_out_scores_ten() {
        assert_eq!(priority_score(3, Difficulty::Medium, Importance::Low), 10);
        assert_eq!(Urgency::from_days_left(3), Urgency::Warning);
    }

    #[test]
    fn overdue_contribution_is_clamped() {
        let today = priority_score(0, Difficulty::Low, Importance::Low);
        assert_eq!(priority_score(-1, Difficulty::Low, Importance::Low), today);
        assert_eq!(priority_score(-30, Difficulty::Low, Importance::Low), today);
    }

    #[test]
    fn score_never_increases_with_more_days_left() {
        for days in -10..30 {
            let closer = priority_score(days, Difficulty::Medium, Importance::Medium);
            let further = priority_score(days + 1, Difficulty::Medium, Importance::Medium);
            assert!(further <= closer, "score rose between {days} and {}", days + 1);
        }
    }

    #[test]
    fn scorecard_matches_parts() {
        use crate::homework::HomeworkStatus;
        use chrono::Utc;

        let hw = Homework {
            id: 1,
            user_id: "u1".into(),
            subject: "Math".into(),
            task_name: "Worksheet 3".into(),
            received_date: None,
            due_date: date(2025, 6, 13),
            difficulty: Difficulty::Medium,
            importance: Importance::Low,
            status: HomeworkStatus::Incomplete,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let card = Scorecard::evaluate(&hw, date(2025, 6, 10));
        assert_eq!(card.days_left, 3);
        assert_eq!(card.priority_score, 10);
        assert_eq!(card.urgency, Urgency::Warning);
    }
}
