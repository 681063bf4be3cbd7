//! Core error types for kadai-core.
//!
//! This module defines the error hierarchy using thiserror, grouped by the
//! collaborator that produced the failure.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for kadai-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// LINE Login errors
    #[error("Login error: {0}")]
    Login(#[from] LoginError),

    /// Message delivery errors
    #[error("Messenger error: {0}")]
    Messenger(#[from] MessengerError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// LINE Login (OAuth code exchange / profile fetch) errors.
#[derive(Error, Debug)]
pub enum LoginError {
    /// Token exchange failed
    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// Profile fetch failed
    #[error("Profile fetch failed: {0}")]
    ProfileFetchFailed(String),

    /// Transport-level failure talking to the provider
    #[error("Login transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Login credentials not configured
    #[error("LINE Login credentials not configured")]
    CredentialsNotConfigured,
}

/// Message delivery errors. A delivery failure is a value the caller
/// inspects, never a panic.
#[derive(Error, Debug)]
pub enum MessengerError {
    /// The push endpoint rejected the message
    #[error("Push rejected: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Transport-level failure before a response was received
    #[error("Push transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Validation errors, raised at ingestion before any scoring happens.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: &'static str, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
