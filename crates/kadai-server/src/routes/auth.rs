use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use kadai_core::User;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUrlResponse {
    pub login_url: String,
}

/// Hand the frontend the LINE web-login URL.
pub async fn login_url(State(state): State<Arc<AppState>>) -> ApiResult<Json<LoginUrlResponse>> {
    let login_url = state.login.authorize_url()?;
    Ok(Json(LoginUrlResponse { login_url }))
}

#[derive(Debug, Deserialize)]
pub struct CallbackRequest {
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct CallbackResponse {
    pub success: bool,
    pub user: User,
}

/// Exchange the authorization code, read the LINE profile, and create or
/// fetch the matching local user.
pub async fn callback(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CallbackRequest>,
) -> ApiResult<Json<CallbackResponse>> {
    if req.code.trim().is_empty() {
        return Err(ApiError::BadRequest("Authorization code required".into()));
    }

    let tokens = state.login.exchange_code(&req.code).await?;
    let profile = state.login.fetch_profile(&tokens.access_token).await?;

    let user = state
        .db
        .lock()
        .await
        .get_or_create_user(&profile.user_id, &profile.display_name)?;

    tracing::info!(user_id = %user.id, "LINE login completed");
    Ok(Json(CallbackResponse {
        success: true,
        user,
    }))
}
