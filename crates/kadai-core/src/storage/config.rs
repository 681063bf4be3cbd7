//! TOML-based application configuration.
//!
//! Stores deployment settings:
//! - HTTP bind address
//! - LINE channel credentials and login redirect
//! - Reminder fire times and horizon
//! - Database location override
//!
//! Configuration is read from `~/.config/kadai/config.toml`. LINE secrets can
//! also come from the environment (`KADAI_LINE_CHANNEL_ID`,
//! `KADAI_LINE_CHANNEL_SECRET`, `KADAI_LINE_ACCESS_TOKEN`), which wins over
//! the file so tokens stay out of it on shared hosts.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// LINE channel credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineConfig {
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub channel_secret: String,
    #[serde(default)]
    pub channel_access_token: String,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
}

/// Reminder scheduling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Morning fire time, "HH:MM" local wall clock.
    #[serde(default = "default_morning")]
    pub morning: String,
    /// Evening fire time, "HH:MM" local wall clock.
    #[serde(default = "default_evening")]
    pub evening: String,
    /// Items due within this many days are eligible for a scheduled reminder.
    #[serde(default = "default_horizon_days")]
    pub horizon_days: i64,
    /// Maximum items in an on-demand reminder digest.
    #[serde(default = "default_reminder_limit")]
    pub reminder_limit: usize,
}

/// Storage location configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Database file path. Defaults to `<data_dir>/kadai.db`.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

/// Application configuration.
///
/// Deserialized from TOML at `~/.config/kadai/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub line: LineConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_redirect_uri() -> String {
    "http://localhost:3000/line-callback.html".to_string()
}
fn default_morning() -> String {
    "08:00".to_string()
}
fn default_evening() -> String {
    "17:00".to_string()
}
fn default_horizon_days() -> i64 {
    7
}
fn default_reminder_limit() -> usize {
    3
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            channel_id: String::new(),
            channel_secret: String::new(),
            channel_access_token: String::new(),
            redirect_uri: default_redirect_uri(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            morning: default_morning(),
            evening: default_evening(),
            horizon_days: default_horizon_days(),
            reminder_limit: default_reminder_limit(),
        }
    }
}

impl Config {
    /// Load from `<data_dir>/config.toml`, falling back to defaults when the
    /// file does not exist, then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = data_dir()?.join("config.toml");
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
                path: path.clone(),
                message: e.to_string(),
            })?;
            toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))?
        } else {
            Config::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("KADAI_LINE_CHANNEL_ID") {
            self.line.channel_id = v;
        }
        if let Ok(v) = std::env::var("KADAI_LINE_CHANNEL_SECRET") {
            self.line.channel_secret = v;
        }
        if let Ok(v) = std::env::var("KADAI_LINE_ACCESS_TOKEN") {
            self.line.channel_access_token = v;
        }
    }

    /// Resolved database path.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("kadai.db")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.notifications.morning, "08:00");
        assert_eq!(config.notifications.evening, "17:00");
        assert_eq!(config.notifications.horizon_days, 7);
        assert_eq!(config.notifications.reminder_limit, 3);
        assert!(config.line.channel_id.is_empty());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 8080

            [line]
            channel_id = "1234"
            channel_access_token = "token"

            [notifications]
            evening = "18:30"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.line.channel_id, "1234");
        assert_eq!(config.line.redirect_uri, default_redirect_uri());
        assert_eq!(config.notifications.evening, "18:30");
        assert_eq!(config.notifications.morning, "08:00");
    }
}
