use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Local;
use std::sync::Arc;

use kadai_core::DashboardStats;

use crate::error::ApiResult;
use crate::state::AppState;

/// Completion statistics for one user's dashboard header.
pub async fn stats(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<DashboardStats>> {
    let today = Local::now().date_naive();
    let stats = state.db.lock().await.dashboard_stats(&user_id, today)?;
    Ok(Json(stats))
}
