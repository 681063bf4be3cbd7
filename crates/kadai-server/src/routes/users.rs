use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use kadai_core::{User, ValidationError};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    pub line_user_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Create or fetch a user keyed by LINE identity.
pub async fn create_or_fetch(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<Json<User>> {
    if req.line_user_id.trim().is_empty() {
        return Err(ValidationError::MissingField("lineUserId").into());
    }
    let name = req.name.as_deref().unwrap_or("User");
    let user = state
        .db
        .lock()
        .await
        .get_or_create_user(&req.line_user_id, name)?;
    Ok(Json(user))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<User>> {
    let user = state
        .db
        .lock()
        .await
        .user_by_id(&user_id)?
        .ok_or_else(|| ApiError::NotFound(format!("User {user_id}")))?;
    Ok(Json(user))
}
