//! Session manager over the file-backed store and exchange.

use tempfile::TempDir;

use sesame_core::{AuthStatus, ManagerConfig, SessionManager, TokenStore};
use sesame_file::{FileExchange, FileTokenStore};

struct Fixture {
    _dir: TempDir,
    store: FileTokenStore,
    exchange: FileExchange,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let store = FileTokenStore::new(dir.path().join("data").join("session.json"));
    let exchange = FileExchange::new(dir.path().join("accounts")).with_cost(4);
    Fixture {
        _dir: dir,
        store,
        exchange,
    }
}

#[tokio::test]
async fn register_survives_restart() {
    let fx = fixture();

    let manager =
        SessionManager::start(fx.store.clone(), fx.exchange.clone(), ManagerConfig::default())
            .await;
    assert_eq!(manager.snapshot().status(), AuthStatus::Unauthenticated);

    let outcome = manager.register("Alice", "alice@example.com", "pw").await;
    assert!(outcome.success, "{:?}", outcome);
    drop(manager);

    let restarted =
        SessionManager::start(fx.store.clone(), fx.exchange.clone(), ManagerConfig::default())
            .await;
    let session = restarted.snapshot();
    assert_eq!(session.status(), AuthStatus::Authenticated);
    assert_eq!(session.user().unwrap().name, "Alice");
}

#[tokio::test]
async fn logout_removes_persisted_token() {
    let fx = fixture();
    let manager = SessionManager::new(fx.store.clone(), fx.exchange.clone(), ManagerConfig::default());
    manager.register("Alice", "alice@example.com", "pw").await;

    manager.logout().await;

    assert_eq!(fx.store.get("authToken").await.unwrap(), None);
    let restarted =
        SessionManager::start(fx.store.clone(), fx.exchange.clone(), ManagerConfig::default())
            .await;
    assert_eq!(restarted.snapshot().status(), AuthStatus::Unauthenticated);
}

#[tokio::test]
async fn revoked_token_is_cleared_on_restore() {
    let fx = fixture();
    let manager = SessionManager::new(fx.store.clone(), fx.exchange.clone(), ManagerConfig::default());
    manager.register("Alice", "alice@example.com", "pw").await;

    let token = fx.store.get("authToken").await.unwrap().unwrap();
    fx.exchange
        .revoke_token(&sesame_core::AuthToken::new(token))
        .unwrap();

    let restarted =
        SessionManager::start(fx.store.clone(), fx.exchange.clone(), ManagerConfig::default())
            .await;
    let session = restarted.snapshot();
    assert_eq!(session.status(), AuthStatus::Error);
    assert!(session.error().is_some());
    assert_eq!(fx.store.get("authToken").await.unwrap(), None);
}

#[tokio::test]
async fn wrong_password_keeps_store_empty() {
    let fx = fixture();
    let manager = SessionManager::new(fx.store.clone(), fx.exchange.clone(), ManagerConfig::default());
    manager.register("Alice", "alice@example.com", "pw").await;
    manager.logout().await;

    let outcome = manager.login("alice@example.com", "wrong").await;

    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("Invalid email or password"));
    assert_eq!(fx.store.get("authToken").await.unwrap(), None);
}
