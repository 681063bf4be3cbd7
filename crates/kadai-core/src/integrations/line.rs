//! LINE Messaging API integration -- push reminders to a user's chat.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::error::MessengerError;
use crate::integrations::traits::Messenger;
use crate::storage::LineConfig;

const DEFAULT_API_BASE: &str = "https://api.line.me";

/// Messenger backed by the LINE Messaging API push endpoint.
pub struct LineMessenger {
    client: Client,
    api_base: String,
    channel_access_token: String,
}

impl LineMessenger {
    pub fn new(config: &LineConfig) -> Self {
        Self {
            client: Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            channel_access_token: config.channel_access_token.clone(),
        }
    }

    /// Point the client at a different API host (for tests).
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl Messenger for LineMessenger {
    async fn push_text(&self, to: &str, text: &str) -> Result<(), MessengerError> {
        let body = json!({
            "to": to,
            "messages": [
                {
                    "type": "text",
                    "text": text,
                }
            ]
        });

        let resp = self
            .client
            .post(format!("{}/v2/bot/message/push", self.api_base))
            .header("Authorization", format!("Bearer {}", self.channel_access_token))
            .json(&body)
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(MessengerError::Rejected { status, body })
        }
    }
}
