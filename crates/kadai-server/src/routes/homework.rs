use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use kadai_core::{
    Difficulty, Homework, HomeworkStatus, HomeworkUpdate, Importance, NewHomework, Scorecard,
    Urgency,
};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHomeworkRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub task_name: String,
    #[serde(default)]
    pub received_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub importance: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateHomeworkResponse {
    pub id: i64,
    pub success: bool,
}

/// Create a homework item. Difficulty/importance/status strings are parsed
/// against the closed enumerations here; unrecognized values are a 400, not
/// a silent default.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateHomeworkRequest>,
) -> ApiResult<Json<CreateHomeworkResponse>> {
    let difficulty = match req.difficulty.as_deref() {
        Some(s) => s.parse()?,
        None => Difficulty::default(),
    };
    let importance = match req.importance.as_deref() {
        Some(s) => s.parse()?,
        None => Importance::default(),
    };
    let status = match req.status.as_deref() {
        Some(s) => s.parse()?,
        None => HomeworkStatus::default(),
    };
    let due_date = req
        .due_date
        .ok_or(kadai_core::ValidationError::MissingField("dueDate"))?;

    let new = NewHomework {
        user_id: req.user_id,
        subject: req.subject,
        task_name: req.task_name,
        received_date: req.received_date,
        due_date,
        difficulty,
        importance,
        status,
    };
    new.validate()?;

    let id = state.db.lock().await.create_homework(&new)?;
    Ok(Json(CreateHomeworkResponse { id, success: true }))
}

/// A stored homework item plus its derived scoring fields.
#[derive(Debug, Serialize)]
pub struct EnrichedHomework {
    #[serde(flatten)]
    pub homework: Homework,
    #[serde(rename = "daysLeft")]
    pub days_left: i64,
    #[serde(rename = "priorityScore")]
    pub priority_score: i64,
    pub urgency: Urgency,
}

/// List a user's homework, highest priority first.
pub async fn list_for_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<EnrichedHomework>>> {
    let items = state.db.lock().await.homework_for_user(&user_id)?;
    let today = Local::now().date_naive();

    let mut enriched: Vec<_> = items
        .into_iter()
        .map(|homework| {
            let card = Scorecard::evaluate(&homework, today);
            EnrichedHomework {
                homework,
                days_left: card.days_left,
                priority_score: card.priority_score,
                urgency: card.urgency,
            }
        })
        .collect();
    enriched.sort_by(|a, b| b.priority_score.cmp(&a.priority_score));

    Ok(Json(enriched))
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHomeworkRequest {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub task_name: Option<String>,
    #[serde(default)]
    pub received_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub importance: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub success: bool,
}

/// Edit fields and/or toggle status.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(homework_id): Path<i64>,
    Json(req): Json<UpdateHomeworkRequest>,
) -> ApiResult<Json<MutationResponse>> {
    let update = HomeworkUpdate {
        subject: req.subject,
        task_name: req.task_name,
        received_date: req.received_date,
        due_date: req.due_date,
        difficulty: req.difficulty.as_deref().map(str::parse).transpose()?,
        importance: req.importance.as_deref().map(str::parse).transpose()?,
        status: req.status.as_deref().map(str::parse).transpose()?,
    };

    let found = state.db.lock().await.update_homework(homework_id, &update)?;
    if !found {
        return Err(ApiError::NotFound(format!("Homework {homework_id}")));
    }
    Ok(Json(MutationResponse { success: true }))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(homework_id): Path<i64>,
) -> ApiResult<Json<MutationResponse>> {
    let found = state.db.lock().await.delete_homework(homework_id)?;
    if !found {
        return Err(ApiError::NotFound(format!("Homework {homework_id}")));
    }
    Ok(Json(MutationResponse { success: true }))
}
