//! LINE Login (OAuth2 Authorization Code) flow for the web app.
//!
//! 1. The browser is sent to the LINE web-login URL
//! 2. LINE redirects back with an authorization code
//! 3. The code is exchanged for an access token
//! 4. The token reads the user's profile, which seeds the local user row
//!
//! The provider's responses are trusted as-is; there is no id-token
//! signature verification here.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::error::LoginError;
use crate::storage::LineConfig;

const DEFAULT_AUTH_BASE: &str = "https://web.line.me";
const DEFAULT_API_BASE: &str = "https://api.line.me";

/// OAuth state parameter pinned by the frontend callback page.
const LOGIN_STATE: &str = "kadai_login_state";
const LOGIN_SCOPE: &str = "profile openid";

/// Token endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Profile endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineProfile {
    pub user_id: String,
    pub display_name: String,
    #[serde(default)]
    pub picture_url: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
}

/// LINE Login client.
pub struct LineLogin {
    client: Client,
    auth_base: String,
    api_base: String,
    channel_id: String,
    channel_secret: String,
    redirect_uri: String,
}

impl LineLogin {
    pub fn new(config: &LineConfig) -> Self {
        Self {
            client: Client::new(),
            auth_base: DEFAULT_AUTH_BASE.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            channel_id: config.channel_id.clone(),
            channel_secret: config.channel_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
        }
    }

    /// Point the client at different hosts (for tests).
    pub fn with_endpoints(mut self, auth_base: &str, api_base: &str) -> Self {
        self.auth_base = auth_base.trim_end_matches('/').to_string();
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    /// The web-login URL the browser should be sent to.
    pub fn authorize_url(&self) -> Result<String, LoginError> {
        if self.channel_id.is_empty() {
            return Err(LoginError::CredentialsNotConfigured);
        }
        let query: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.channel_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("state", LOGIN_STATE)
            .append_pair("scope", LOGIN_SCOPE)
            .finish();
        Ok(format!("{}/web/login?{query}", self.auth_base))
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, LoginError> {
        if self.channel_id.is_empty() || self.channel_secret.is_empty() {
            return Err(LoginError::CredentialsNotConfigured);
        }
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("client_id", self.channel_id.as_str()),
            ("client_secret", self.channel_secret.as_str()),
        ];

        let resp = self
            .client
            .post(format!("{}/oauth2/v2.1/token", self.api_base))
            .form(&params)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(LoginError::TokenExchangeFailed(format!(
                "HTTP {status}: {body}"
            )));
        }

        let body: serde_json::Value = resp.json().await?;
        if let Some(error) = body.get("error") {
            return Err(LoginError::TokenExchangeFailed(error.to_string()));
        }
        serde_json::from_value(body)
            .map_err(|e| LoginError::TokenExchangeFailed(e.to_string()))
    }

    /// Fetch the profile of the user the access token belongs to.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<LineProfile, LoginError> {
        let resp = self
            .client
            .get(format!("{}/v2/profile", self.api_base))
            .header("Authorization", format!("Bearer {access_token}"))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(LoginError::ProfileFetchFailed(format!(
                "HTTP {status}: {body}"
            )));
        }

        Ok(resp.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LineConfig {
        LineConfig {
            channel_id: "1234567890".to_string(),
            channel_secret: "secret".to_string(),
            channel_access_token: String::new(),
            redirect_uri: "http://localhost:3000/line-callback.html".to_string(),
        }
    }

    #[test]
    fn authorize_url_carries_the_login_parameters() {
        let login = LineLogin::new(&config());
        let url = login.authorize_url().unwrap();
        assert!(url.starts_with("https://web.line.me/web/login?"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=1234567890"));
        assert!(url.contains("scope=profile+openid"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fline-callback.html"));
    }

    #[test]
    fn authorize_url_requires_credentials() {
        let login = LineLogin::new(&LineConfig::default());
        assert!(matches!(
            login.authorize_url(),
            Err(LoginError::CredentialsNotConfigured)
        ));
    }
}
