//! Reminder scheduler driver.
//!
//! Fires the eligibility engine at two configurable wall-clock times each
//! day: a morning run with the lighter template and an evening run with the
//! standard one. The next fire time is computed with chrono and awaited with
//! `tokio::time::sleep`; there is no cron syntax anywhere.
//!
//! Passes are serialized behind an async mutex so an overlapping trigger
//! cannot double-send; the `(homework_id, sent_on)` unique index in storage
//! is the backstop across processes.

use chrono::{Local, NaiveDateTime, NaiveTime};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{messages::MessageTemplate, run_notification_pass, PassSummary};
use crate::error::{ConfigError, CoreError};
use crate::integrations::traits::Messenger;
use crate::storage::{Database, NotificationsConfig};

fn parse_fire_time(key: &str, value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("expected HH:MM, got '{value}'"),
    })
}

/// The next trigger strictly after `now`: today's remaining fire times, else
/// tomorrow's morning.
fn next_trigger(
    now: NaiveDateTime,
    morning: NaiveTime,
    evening: NaiveTime,
) -> (NaiveDateTime, MessageTemplate) {
    let today = now.date();
    let mut candidates = vec![
        (today.and_time(morning), MessageTemplate::Morning),
        (today.and_time(evening), MessageTemplate::Evening),
        (
            today.succ_opt().unwrap_or(today).and_time(morning),
            MessageTemplate::Morning,
        ),
    ];
    candidates.sort_by_key(|(at, _)| *at);
    candidates
        .into_iter()
        .find(|(at, _)| *at > now)
        .unwrap_or((today.succ_opt().unwrap_or(today).and_time(morning), MessageTemplate::Morning))
}

/// Drives the daily reminder passes.
pub struct ReminderScheduler {
    db: Arc<Mutex<Database>>,
    messenger: Arc<dyn Messenger>,
    morning: NaiveTime,
    evening: NaiveTime,
    horizon_days: i64,
    pass_gate: Mutex<()>,
}

impl ReminderScheduler {
    pub fn new(
        db: Arc<Mutex<Database>>,
        messenger: Arc<dyn Messenger>,
        config: &NotificationsConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            db,
            messenger,
            morning: parse_fire_time("notifications.morning", &config.morning)?,
            evening: parse_fire_time("notifications.evening", &config.evening)?,
            horizon_days: config.horizon_days,
            pass_gate: Mutex::new(()),
        })
    }

    /// Run one eligibility pass now with the given template.
    ///
    /// Exposed so an external orchestrator can trigger a pass without waiting
    /// for the wall clock. At most one pass runs at a time.
    pub async fn run_pass(&self, template: MessageTemplate) -> Result<PassSummary, CoreError> {
        let _guard = self.pass_gate.lock().await;
        let today = Local::now().date_naive();
        run_notification_pass(
            &self.db,
            self.messenger.as_ref(),
            template,
            today,
            self.horizon_days,
        )
        .await
    }

    /// Loop forever, firing the morning and evening passes at their
    /// configured times. Every failure is caught and logged; nothing escapes
    /// this task.
    pub async fn run(self: Arc<Self>) {
        loop {
            let now = Local::now().naive_local();
            let (fire_at, template) = next_trigger(now, self.morning, self.evening);
            let wait = (fire_at - now)
                .to_std()
                .unwrap_or(std::time::Duration::ZERO);
            tracing::debug!(?fire_at, ?template, "next reminder pass scheduled");
            tokio::time::sleep(wait).await;

            match self.run_pass(template).await {
                Ok(summary) => {
                    tracing::info!(
                        eligible = summary.eligible,
                        sent = summary.sent,
                        failed = summary.failed,
                        already_sent = summary.already_sent,
                        "reminder pass completed"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "reminder pass aborted");
                }
            }
        }
    }
}
