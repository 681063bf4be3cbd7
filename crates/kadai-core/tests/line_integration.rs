//! Integration tests for the LINE clients against mocked HTTP endpoints.

use kadai_core::error::MessengerError;
use kadai_core::integrations::{LineLogin, LineMessenger};
use kadai_core::storage::LineConfig;
use kadai_core::Messenger;

fn config() -> LineConfig {
    LineConfig {
        channel_id: "1234567890".to_string(),
        channel_secret: "channel-secret".to_string(),
        channel_access_token: "channel-token".to_string(),
        redirect_uri: "http://localhost:3000/line-callback.html".to_string(),
    }
}

#[tokio::test]
async fn push_text_hits_the_push_endpoint() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v2/bot/message/push")
        .match_header("authorization", "Bearer channel-token")
        .match_body(mockito::Matcher::PartialJsonString(
            r#"{"to": "U-line", "messages": [{"type": "text", "text": "hello"}]}"#.to_string(),
        ))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let messenger = LineMessenger::new(&config()).with_api_base(&server.url());
    messenger.push_text("U-line", "hello").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn push_rejection_is_an_error_value() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v2/bot/message/push")
        .with_status(400)
        .with_body(r#"{"message":"The request body has 1 error(s)"}"#)
        .create_async()
        .await;

    let messenger = LineMessenger::new(&config()).with_api_base(&server.url());
    let err = messenger.push_text("U-line", "hello").await.unwrap_err();
    match err {
        MessengerError::Rejected { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("error"));
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn code_exchange_parses_the_token_response() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/oauth2/v2.1/token")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .with_status(200)
        .with_body(
            r#"{
                "access_token": "at-123",
                "token_type": "Bearer",
                "expires_in": 2592000,
                "refresh_token": "rt-456",
                "id_token": "jwt-789",
                "scope": "profile openid"
            }"#,
        )
        .create_async()
        .await;

    let login = LineLogin::new(&config()).with_endpoints(&server.url(), &server.url());
    let tokens = login.exchange_code("auth-code").await.unwrap();
    assert_eq!(tokens.access_token, "at-123");
    assert_eq!(tokens.token_type, "Bearer");
    assert_eq!(tokens.refresh_token.as_deref(), Some("rt-456"));
    mock.assert_async().await;
}

#[tokio::test]
async fn code_exchange_surfaces_provider_errors() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/oauth2/v2.1/token")
        .with_status(400)
        .with_body(r#"{"error":"invalid_grant","error_description":"invalid code"}"#)
        .create_async()
        .await;

    let login = LineLogin::new(&config()).with_endpoints(&server.url(), &server.url());
    let err = login.exchange_code("bad-code").await.unwrap_err();
    assert!(err.to_string().contains("Token exchange failed"));
}

#[tokio::test]
async fn profile_fetch_reads_camel_case_fields() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v2/profile")
        .match_header("authorization", "Bearer at-123")
        .with_status(200)
        .with_body(
            r#"{
                "userId": "U-line",
                "displayName": "Mina",
                "pictureUrl": "https://profile.line-scdn.net/abc",
                "statusMessage": "studying"
            }"#,
        )
        .create_async()
        .await;

    let login = LineLogin::new(&config()).with_endpoints(&server.url(), &server.url());
    let profile = login.fetch_profile("at-123").await.unwrap();
    assert_eq!(profile.user_id, "U-line");
    assert_eq!(profile.display_name, "Mina");
    assert!(profile.picture_url.is_some());
    mock.assert_async().await;
}
