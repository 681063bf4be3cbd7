pub mod auth;
pub mod dashboard;
pub mod health;
pub mod homework;
pub mod reminders;
pub mod users;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/auth/line/login-url", get(auth::login_url))
        .route("/api/auth/line/callback", post(auth::callback))
        .route("/api/user", post(users::create_or_fetch))
        .route("/api/user/:user_id", get(users::get_user))
        // GET takes a user id, PUT/DELETE a homework id, as in the original
        // API; the placeholder has to be shared for the paths to coexist.
        .route("/api/homework", post(homework::create))
        .route("/api/homework/:id", get(homework::list_for_user))
        .route("/api/homework/:id", put(homework::update))
        .route("/api/homework/:id", delete(homework::remove))
        .route("/api/dashboard/:user_id", get(dashboard::stats))
        .route("/api/send-reminder/:user_id", post(reminders::send))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
