mod config;
pub mod database;

pub use config::{Config, LineConfig, NotificationsConfig, ServerConfig, StorageConfig};
pub use database::{DashboardStats, Database};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/kadai[-dev]/` based on KADAI_ENV.
///
/// Set KADAI_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("KADAI_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("kadai-dev")
    } else {
        base_dir.join("kadai")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::LoadFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
