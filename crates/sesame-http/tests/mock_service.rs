//! Mock auth service tests.
//!
//! These tests use wiremock to simulate the auth service and exercise the
//! HTTP exchange, alone and behind a session manager.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sesame_core::error::{AuthError, Error, ErrorKind};
use sesame_core::{
    AuthStatus, AuthToken, CredentialExchange, Credentials, Email, ManagerConfig,
    MemoryTokenStore, Registration, ServiceUrl, SessionManager, TokenStore,
};
use sesame_http::HttpExchange;

/// Helper to create a service URL from a mock server.
fn mock_service_url(server: &MockServer) -> ServiceUrl {
    ServiceUrl::new(format!("http://127.0.0.1:{}", server.address().port())).unwrap()
}

fn exchange(server: &MockServer) -> HttpExchange {
    HttpExchange::new(mock_service_url(server)).unwrap()
}

fn credentials(email: &str, password: &str) -> Credentials {
    Credentials::new(Email::new(email).unwrap(), password)
}

fn user_json(id: &str, name: &str, email: &str) -> serde_json::Value {
    json!({ "_id": id, "name": name, "email": email })
}

// ============================================================================
// Exchange
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "a@b.com", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "token": "jwt-123",
            "user": user_json("64f1", "User", "a@b.com")
        })))
        .mount(&server)
        .await;

    let grant = exchange(&server)
        .authenticate(&credentials("a@b.com", "pw"))
        .await
        .unwrap();

    assert_eq!(grant.token.as_str(), "jwt-123");
    assert_eq!(grant.user.id.as_str(), "64f1");
    assert_eq!(grant.user.email.as_str(), "a@b.com");
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "Invalid credentials"
        })))
        .mount(&server)
        .await;

    let err = exchange(&server)
        .authenticate(&credentials("bad@b.com", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ValidationFailure);
    assert_eq!(err.user_message(), "Invalid credentials");
}

#[tokio::test]
async fn test_login_server_error_is_network_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "Server Error"
        })))
        .mount(&server)
        .await;

    let err = exchange(&server)
        .authenticate(&credentials("a@b.com", "pw"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NetworkFailure);
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_login_missing_route_is_network_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Cannot POST /api/auth/login"))
        .mount(&server)
        .await;

    let err = exchange(&server)
        .authenticate(&credentials("a@b.com", "pw"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NetworkFailure);
    assert!(matches!(err, Error::Protocol(ref p) if p.status == 404));
}

#[tokio::test]
async fn test_login_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = exchange(&server)
        .authenticate(&credentials("a@b.com", "pw"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Protocol(_)));
}

#[tokio::test]
async fn test_register_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_json(json!({
            "name": "Alice",
            "email": "alice@example.com",
            "password": "pw"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "token": "jwt-new",
            "user": { "id": 7, "name": "Alice", "email": "alice@example.com" }
        })))
        .mount(&server)
        .await;

    let registration =
        Registration::new("Alice", Email::new("alice@example.com").unwrap(), "pw").unwrap();
    let grant = exchange(&server)
        .create_account(&registration)
        .await
        .unwrap();

    assert_eq!(grant.token.as_str(), "jwt-new");
    assert_eq!(grant.user.id.as_str(), "7");
    assert_eq!(grant.user.name, "Alice");
}

#[tokio::test]
async fn test_register_conflict() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "User already exists"
        })))
        .mount(&server)
        .await;

    let registration =
        Registration::new("Alice", Email::new("alice@example.com").unwrap(), "pw").unwrap();
    let err = exchange(&server)
        .create_account(&registration)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Auth(AuthError::AccountExists { ref email }) if email == "alice@example.com"
    ));
}

#[tokio::test]
async fn test_validate_token_sends_bearer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer jwt-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": user_json("64f1", "User", "user@example.com")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = exchange(&server)
        .validate_token(&AuthToken::new("jwt-123"))
        .await
        .unwrap();

    assert_eq!(user.name, "User");
}

#[tokio::test]
async fn test_validate_token_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Not authorized, token failed"
        })))
        .mount(&server)
        .await;

    let err = exchange(&server)
        .validate_token(&AuthToken::new("stale"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TokenInvalid);
}

#[tokio::test]
async fn test_request_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "user": user_json("1", "User", "user@example.com") }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let exchange = HttpExchange::builder(mock_service_url(&server))
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let err = exchange
        .validate_token(&AuthToken::new("jwt"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NetworkFailure);
}

#[tokio::test]
async fn test_custom_prefix() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/session/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt",
            "user": user_json("1", "User", "a@b.com")
        })))
        .mount(&server)
        .await;

    let exchange = HttpExchange::builder(mock_service_url(&server))
        .prefix("/v2/session/")
        .build()
        .unwrap();

    assert!(exchange.authenticate(&credentials("a@b.com", "pw")).await.is_ok());
}

#[tokio::test]
async fn test_service_unreachable() {
    // Bind and drop a listener to get a port nothing listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let url = ServiceUrl::new(format!("http://127.0.0.1:{}", port)).unwrap();

    let err = HttpExchange::new(url)
        .unwrap()
        .authenticate(&credentials("a@b.com", "pw"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NetworkFailure);
}

// ============================================================================
// Session manager over HTTP
// ============================================================================

#[tokio::test]
async fn test_manager_login_then_restore() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt-123",
            "user": user_json("64f1", "User", "a@b.com")
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer jwt-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": user_json("64f1", "User", "a@b.com")
        })))
        .mount(&server)
        .await;

    let store = MemoryTokenStore::new();
    let manager =
        SessionManager::start(store.clone(), exchange(&server), ManagerConfig::default()).await;
    assert_eq!(manager.snapshot().status(), AuthStatus::Unauthenticated);

    let outcome = manager.login("a@b.com", "pw").await;
    assert!(outcome.success);
    assert_eq!(
        store.get("authToken").await.unwrap().as_deref(),
        Some("jwt-123")
    );

    // A fresh manager over the same store picks the session back up.
    let restored =
        SessionManager::start(store.clone(), exchange(&server), ManagerConfig::default()).await;
    let session = restored.snapshot();
    assert_eq!(session.status(), AuthStatus::Authenticated);
    assert_eq!(session.user().unwrap().email.as_str(), "a@b.com");
}

#[tokio::test]
async fn test_manager_restore_with_rejected_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Not authorized"
        })))
        .mount(&server)
        .await;

    let store = MemoryTokenStore::with_entry("authToken", "stale");
    let manager =
        SessionManager::start(store.clone(), exchange(&server), ManagerConfig::default()).await;

    let session = manager.snapshot();
    assert!(session.user().is_none());
    assert!(session.error().is_some());
    assert_eq!(store.get("authToken").await.unwrap(), None);
}

#[tokio::test]
async fn test_manager_login_failure_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Invalid credentials"
        })))
        .mount(&server)
        .await;

    let store = MemoryTokenStore::new();
    let manager = SessionManager::new(store.clone(), exchange(&server), ManagerConfig::default());

    let outcome = manager.login("bad@b.com", "wrong").await;

    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("Invalid credentials"));
    assert!(store.is_empty().await);
}
