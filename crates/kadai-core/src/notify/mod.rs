//! Notification-eligibility engine.
//!
//! Decides which homework items warrant a reminder today, renders the
//! message, and records delivered reminders in the notification log. The
//! persistence handle and the messenger are passed in explicitly; nothing in
//! this module touches global state.

pub mod messages;
pub mod scheduler;

pub use messages::MessageTemplate;
pub use scheduler::ReminderScheduler;

use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;

use crate::error::CoreError;
use crate::integrations::traits::Messenger;
use crate::scoring;
use crate::storage::Database;

/// Outcome counters for one scheduled reminder pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Incomplete items inside the notification horizon.
    pub eligible: usize,
    /// Messages delivered and recorded.
    pub sent: usize,
    /// Deliveries that failed; the items stay eligible for the next run.
    pub failed: usize,
    /// Items skipped because a reminder was already recorded today.
    pub already_sent: usize,
    /// Items skipped because the owner has no LINE identity.
    pub no_recipient: usize,
}

/// Run one reminder pass over every incomplete homework item.
///
/// An item is eligible when it is due within `horizon_days` (inclusive) and
/// not yet overdue, its owner has a LINE identity, and no reminder was
/// recorded for it today. A delivery failure is logged and skipped; a storage
/// failure aborts the batch, leaving already-recorded reminders committed.
pub async fn run_notification_pass(
    db: &Mutex<Database>,
    messenger: &dyn Messenger,
    template: MessageTemplate,
    today: NaiveDate,
    horizon_days: i64,
) -> Result<PassSummary, CoreError> {
    let items = db.lock().await.incomplete_homework()?;
    let mut summary = PassSummary::default();

    for hw in items {
        let days_left = scoring::days_left(hw.due_date, today);
        if days_left < 0 || days_left > horizon_days {
            continue;
        }
        summary.eligible += 1;

        let user = match db.lock().await.user_by_id(&hw.user_id)? {
            Some(user) => user,
            None => {
                summary.no_recipient += 1;
                continue;
            }
        };
        let line_user_id = match user.line_user_id {
            Some(id) => id,
            None => {
                summary.no_recipient += 1;
                continue;
            }
        };

        if db.lock().await.notification_sent_on(hw.id, today)? {
            summary.already_sent += 1;
            continue;
        }

        let body = messages::render(&hw, days_left, template);
        match messenger.push_text(&line_user_id, &body).await {
            Ok(()) => {
                let recorded =
                    db.lock()
                        .await
                        .record_notification(&hw.user_id, hw.id, Utc::now(), today)?;
                if recorded {
                    summary.sent += 1;
                    tracing::info!(
                        homework_id = hw.id,
                        subject = %hw.subject,
                        days_left,
                        "reminder sent"
                    );
                } else {
                    // A concurrent pass recorded it between our check and send.
                    summary.already_sent += 1;
                }
            }
            Err(e) => {
                summary.failed += 1;
                tracing::warn!(homework_id = hw.id, error = %e, "reminder delivery failed");
            }
        }
    }

    Ok(summary)
}

/// Result of an on-demand reminder request.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct ReminderOutcome {
    pub success: bool,
    pub message: String,
}

impl ReminderOutcome {
    fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
        }
    }
}

/// Send one combined reminder digest to a single user, on demand.
///
/// Fetches up to `limit` soonest-due incomplete items with no horizon filter.
/// Deliberately writes no notification record: manual reminders do not
/// participate in the daily dedup, in either direction.
pub async fn send_user_reminder(
    db: &Mutex<Database>,
    messenger: &dyn Messenger,
    user_id: &str,
    limit: usize,
    today: NaiveDate,
) -> Result<ReminderOutcome, CoreError> {
    let items = db.lock().await.soonest_due_incomplete(user_id, limit)?;
    if items.is_empty() {
        return Ok(ReminderOutcome::failure("No incomplete homework to remind about"));
    }

    let user = match db.lock().await.user_by_id(user_id)? {
        Some(user) => user,
        None => return Ok(ReminderOutcome::failure("User not found")),
    };
    let line_user_id = match user.line_user_id {
        Some(id) => id,
        None => return Ok(ReminderOutcome::failure("User has no LINE account linked")),
    };

    let scored: Vec<_> = items
        .into_iter()
        .map(|hw| {
            let days_left = scoring::days_left(hw.due_date, today);
            (hw, days_left)
        })
        .collect();
    let body = messages::render_digest(&scored);

    match messenger.push_text(&line_user_id, &body).await {
        Ok(()) => Ok(ReminderOutcome {
            success: true,
            message: "Reminder sent".to_string(),
        }),
        Err(e) => {
            tracing::warn!(user_id, error = %e, "on-demand reminder failed");
            Ok(ReminderOutcome::failure("Reminder delivery failed"))
        }
    }
}
