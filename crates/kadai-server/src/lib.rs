//! HTTP API for Kadai.
//!
//! A thin axum layer over kadai-core: request/response mapping, API error
//! translation, and shared state. All business rules live in the core crate.

pub mod error;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
