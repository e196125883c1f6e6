//! Hosted auth client tests (using WireMock)
//! These tests are fast and don't require a real auth service.

use hireboard_core::config::AuthServiceConfig;
use hireboard_core::error::AppError;
use hireboard_core::gotrue::GoTrueSessionProvider;
use hireboard_core::session::{IdentityEvent, SessionProvider};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_ID: &str = "0b6c3a8e-2f35-4c0b-9d43-0a4f6f6c1a11";

fn create_test_provider(base_url: &str) -> GoTrueSessionProvider {
    GoTrueSessionProvider::new(AuthServiceConfig {
        url: base_url.to_string(),
        anon_key: "anon-key".to_string(),
        timeout_ms: 2000,
    })
    .unwrap()
}

fn token_body(expires_in: i64) -> serde_json::Value {
    json!({
        "access_token": "access-1",
        "token_type": "bearer",
        "expires_in": expires_in,
        "refresh_token": "refresh-1",
        "user": { "id": USER_ID, "email": "recruiter@example.com" }
    })
}

async fn mount_password_grant(server: &MockServer, expires_in: i64) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", "anon-key"))
        .and(body_json(json!({
            "email": "recruiter@example.com",
            "password": "secret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(expires_in)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_authenticate_success_emits_signed_in() {
    let server = MockServer::start().await;
    mount_password_grant(&server, 3600).await;

    let provider = create_test_provider(&server.uri());
    let mut events = provider.subscribe();

    let identity = provider
        .authenticate("recruiter@example.com", "secret")
        .await
        .unwrap();

    assert_eq!(identity.id.to_string(), USER_ID);
    assert_eq!(identity.email.as_deref(), Some("recruiter@example.com"));
    assert_eq!(events.recv().await.unwrap(), IdentityEvent::SignedIn(identity.clone()));
    assert_eq!(provider.current_identity().await.unwrap(), Some(identity));
}

#[tokio::test]
async fn test_authenticate_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let provider = create_test_provider(&server.uri());
    let result = provider.authenticate("recruiter@example.com", "wrong").await;

    match result {
        Err(AppError::Unauthenticated(message)) => {
            assert_eq!(message, "Invalid login credentials")
        }
        other => panic!("unexpected: {:?}", other),
    }
    assert_eq!(provider.current_identity().await.unwrap(), None);
}

#[tokio::test]
async fn test_authenticate_server_error_is_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let provider = create_test_provider(&server.uri());
    let err = provider
        .authenticate("recruiter@example.com", "secret")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::StoreUnavailable(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_end_session_revokes_token() {
    let server = MockServer::start().await;
    mount_password_grant(&server, 3600).await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let provider = create_test_provider(&server.uri());
    provider
        .authenticate("recruiter@example.com", "secret")
        .await
        .unwrap();
    let mut events = provider.subscribe();

    provider.end_session().await.unwrap();

    assert_eq!(events.recv().await.unwrap(), IdentityEvent::SignedOut);
    assert_eq!(provider.current_identity().await.unwrap(), None);
}

#[tokio::test]
async fn test_end_session_without_session_is_noop() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let provider = create_test_provider(&server.uri());
    provider.end_session().await.unwrap();
}

#[tokio::test]
async fn test_expired_session_is_refreshed() {
    let server = MockServer::start().await;
    mount_password_grant(&server, 0).await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .and(body_json(json!({ "refresh_token": "refresh-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(3600)))
        .expect(1)
        .mount(&server)
        .await;

    let provider = create_test_provider(&server.uri());
    let identity = provider
        .authenticate("recruiter@example.com", "secret")
        .await
        .unwrap();

    assert_eq!(provider.current_identity().await.unwrap(), Some(identity.clone()));
    // Second read uses the renewed session
    assert_eq!(provider.current_identity().await.unwrap(), Some(identity));
}

#[tokio::test]
async fn test_rejected_refresh_signs_out() {
    let server = MockServer::start().await;
    mount_password_grant(&server, 0).await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "msg": "Invalid Refresh Token"
        })))
        .mount(&server)
        .await;

    let provider = create_test_provider(&server.uri());
    provider
        .authenticate("recruiter@example.com", "secret")
        .await
        .unwrap();
    let mut events = provider.subscribe();

    assert_eq!(provider.current_identity().await.unwrap(), None);
    assert_eq!(events.recv().await.unwrap(), IdentityEvent::SignedOut);
}

#[test]
fn test_invalid_base_url_rejected() {
    let result = GoTrueSessionProvider::new(AuthServiceConfig {
        url: "not a url".to_string(),
        anon_key: "anon".to_string(),
        timeout_ms: 1000,
    });
    assert!(matches!(result, Err(AppError::Validation(_))));
}
