use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Local;
use std::sync::Arc;

use kadai_core::notify::{self, ReminderOutcome};

use crate::error::ApiResult;
use crate::state::AppState;

/// Send an on-demand reminder digest to one user.
///
/// This path never writes a notification record, so it neither consumes nor
/// respects the scheduled passes' per-day dedup.
pub async fn send(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ReminderOutcome>> {
    let today = Local::now().date_naive();
    let outcome = notify::send_user_reminder(
        &state.db,
        state.messenger.as_ref(),
        &user_id,
        state.config.notifications.reminder_limit,
        today,
    )
    .await?;
    Ok(Json(outcome))
}
