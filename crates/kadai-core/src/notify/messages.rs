//! Reminder message rendering.
//!
//! The evening and morning templates carry the same facts; the morning one
//! only changes the greeting and closing tone. Eligibility never depends on
//! the template.

use crate::homework::Homework;
use crate::scoring::Urgency;

/// Which daily template to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTemplate {
    /// Standard evening reminder.
    Evening,
    /// Lighter-toned morning reminder.
    Morning,
}

fn urgency_heading(days_left: i64) -> &'static str {
    match Urgency::from_days_left(days_left) {
        Urgency::Critical => "URGENT: due very soon!",
        Urgency::Warning => "Heads up: deadline approaching",
        Urgency::Normal => "Homework reminder",
    }
}

/// Morning greetings get finer-grained the closer the deadline is.
fn morning_heading(days_left: i64) -> &'static str {
    match days_left {
        0 => "Due today!",
        1 => "Only 1 day left!",
        2 => "Urgent!",
        d if d <= 5 => "Deadline approaching",
        _ => "Homework reminder",
    }
}

/// Render the single-item reminder body.
pub fn render(homework: &Homework, days_left: i64, template: MessageTemplate) -> String {
    let heading = match template {
        MessageTemplate::Evening => urgency_heading(days_left).to_string(),
        MessageTemplate::Morning => {
            format!("Good morning!\n\n{}", morning_heading(days_left))
        }
    };

    let mut body = format!(
        "{heading}\n\n\
         Subject: {}\n\
         Task: {}\n\
         Due: {}\n\
         Days left: {days_left}\n\
         Importance: {}\n\
         Difficulty: {}",
        homework.subject,
        homework.task_name,
        homework.due_date,
        homework.importance,
        homework.difficulty,
    );

    if template == MessageTemplate::Morning {
        body.push_str("\n\nDon't forget to finish it!");
    }
    body
}

/// Render the combined on-demand digest: a numbered list of the soonest-due
/// items, each tagged with an urgency marker.
pub fn render_digest(items: &[(Homework, i64)]) -> String {
    let mut body = String::from("Homework reminders\n");
    for (index, (hw, days_left)) in items.iter().enumerate() {
        let marker = match Urgency::from_days_left(*days_left) {
            Urgency::Critical => "[!]",
            Urgency::Warning => "[~]",
            Urgency::Normal => "[ ]",
        };
        body.push_str(&format!(
            "\n{}. {marker} {} - {}\n   due {} ({days_left} days left)",
            index + 1,
            hw.subject,
            hw.task_name,
            hw.due_date,
        ));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::homework::{Difficulty, HomeworkStatus, Importance};
    use chrono::{NaiveDate, Utc};

    fn sample(subject: &str, due: NaiveDate) -> Homework {
        Homework {
            id: 1,
            user_id: "u1".into(),
            subject: subject.into(),
            task_name: "Worksheet".into(),
            received_date: None,
            due_date: due,
            difficulty: Difficulty::Medium,
            importance: Importance::High,
            status: HomeworkStatus::Incomplete,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn evening_heading_follows_urgency() {
        let hw = sample("Math", date(2025, 6, 12));
        assert!(render(&hw, 2, MessageTemplate::Evening).starts_with("URGENT"));
        assert!(render(&hw, 4, MessageTemplate::Evening).starts_with("Heads up"));
        assert!(render(&hw, 7, MessageTemplate::Evening).starts_with("Homework reminder"));
    }

    #[test]
    fn morning_variant_changes_tone_only() {
        let hw = sample("Math", date(2025, 6, 12));
        let morning = render(&hw, 0, MessageTemplate::Morning);
        let evening = render(&hw, 0, MessageTemplate::Evening);
        assert!(morning.starts_with("Good morning!"));
        assert!(morning.contains("Due today!"));
        // Same facts in both.
        for line in ["Subject: Math", "Task: Worksheet", "Days left: 0"] {
            assert!(morning.contains(line));
            assert!(evening.contains(line));
        }
    }

    #[test]
    fn digest_numbers_and_marks_items() {
        let items = vec![
            (sample("Math", date(2025, 6, 11)), 1),
            (sample("History", date(2025, 6, 14)), 4),
            (sample("Art", date(2025, 6, 20)), 10),
        ];
        let digest = render_digest(&items);
        assert!(digest.contains("1. [!] Math"));
        assert!(digest.contains("2. [~] History"));
        assert!(digest.contains("3. [ ] Art"));
        assert!(digest.contains("(10 days left)"));
    }
}
