//! The authentication session manager.
//!
//! [`SessionManager`] is the only writer of [`Session`] state. Every
//! operation bumps an epoch under the commit lock; a result is only applied
//! if its epoch is still the latest when it comes back, so a logout issued
//! while a login is in flight always wins.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, instrument, warn};

use crate::error::{Error, TransportError};
use crate::session::Session;
use crate::traits::{AuthGrant, CredentialExchange, TokenStore};
use crate::types::{Email, User};
use crate::{AuthToken, Credentials, Registration, Result};

/// Key the token is stored under unless configured otherwise.
pub const DEFAULT_TOKEN_KEY: &str = "authToken";

/// Message reported by an operation overtaken by a newer one.
pub const SUPERSEDED: &str = "superseded by a newer request";

/// Session manager configuration.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Token store key.
    pub token_key: String,
    /// Upper bound on validating a stored token during restore.
    pub restore_timeout: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            restore_timeout: Duration::from_secs(10),
        }
    }
}

/// Result of a login, registration or logout.
///
/// Serializes as `{"success": true}` or `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuthOutcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Orchestrates login, registration, logout and session restoration.
///
/// Cloning is cheap and every clone drives the same session. Consumers read
/// snapshots via [`snapshot`](Self::snapshot) or follow changes via
/// [`subscribe`](Self::subscribe); they never mutate state directly.
///
/// None of the operations return `Err`: failures end up as a message on
/// the session and in the returned [`AuthOutcome`].
pub struct SessionManager<S, X> {
    inner: Arc<ManagerInner<S, X>>,
}

struct ManagerInner<S, X> {
    store: S,
    exchange: X,
    config: ManagerConfig,
    state: watch::Sender<Session>,
    epoch: AtomicU64,
    commit: Mutex<()>,
}

impl<S, X> Clone for SessionManager<S, X> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, X> SessionManager<S, X>
where
    S: TokenStore,
    X: CredentialExchange,
{
    /// Create a manager in the `Initializing` state.
    ///
    /// Call [`restore`](Self::restore) to resolve it, or use
    /// [`start`](Self::start) which does both.
    pub fn new(store: S, exchange: X, config: ManagerConfig) -> Self {
        let (state, _) = watch::channel(Session::initializing());
        Self {
            inner: Arc::new(ManagerInner {
                store,
                exchange,
                config,
                state,
                epoch: AtomicU64::new(0),
                commit: Mutex::new(()),
            }),
        }
    }

    /// Create a manager and restore any stored session.
    pub async fn start(store: S, exchange: X, config: ManagerConfig) -> Self {
        let manager = Self::new(store, exchange, config);
        manager.restore().await;
        manager
    }

    /// The current session.
    pub fn snapshot(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    /// Follow session changes.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    /// Resolve the session from the stored token.
    ///
    /// No token (or an unreadable store) leaves the session unauthenticated
    /// without contacting the exchange. A token the exchange rejects is
    /// deleted. Transport failures and timeouts keep the token so a later
    /// restore can try again.
    #[instrument(skip(self), fields(key = %self.inner.config.token_key))]
    pub async fn restore(&self) -> Session {
        let epoch = self.begin(None).await;
        let key = self.inner.config.token_key.as_str();

        let token = match self.inner.store.get(key).await {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Token store unavailable, continuing logged out");
                None
            }
        };

        let Some(token) = token.map(AuthToken::new) else {
            let _guard = self.inner.commit.lock().await;
            if self.is_current(epoch) {
                debug!("No stored token");
                self.publish(Session::unauthenticated());
            }
            return self.snapshot();
        };

        {
            let _guard = self.inner.commit.lock().await;
            if !self.is_current(epoch) {
                return self.snapshot();
            }
            self.publish(Session::authenticating());
        }

        let limit = self.inner.config.restore_timeout;
        let result =
            match tokio::time::timeout(limit, self.inner.exchange.validate_token(&token)).await {
                Ok(result) => result,
                Err(_) => Err(TransportError::Timeout {
                    duration_ms: limit.as_millis() as u64,
                }
                .into()),
            };

        let _guard = self.inner.commit.lock().await;
        if !self.is_current(epoch) {
            debug!("Discarding superseded restore");
            return self.snapshot();
        }

        match result {
            Ok(user) => {
                info!(user = %user.id, "Session restored");
                self.publish(Session::authenticated(user));
            }
            Err(e) => {
                warn!(error = %e, "Session restore failed");
                if e.is_token_rejection()
                    && let Err(store_err) = self.inner.store.delete(key).await
                {
                    warn!(error = %store_err, "Failed to clear rejected token");
                }
                self.publish(Session::failed(e.user_message()));
            }
        }

        self.snapshot()
    }

    /// Sign in with an email and password.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AuthOutcome {
        let epoch = self.begin(Some(Session::authenticating())).await;

        let result = async {
            let credentials = Credentials::new(Email::new(email)?, password);
            self.inner.exchange.authenticate(&credentials).await
        }
        .await;

        self.complete(epoch, result).await
    }

    /// Create an account and sign in to it.
    #[instrument(skip(self, password))]
    pub async fn register(&self, name: &str, email: &str, password: &str) -> AuthOutcome {
        let epoch = self.begin(Some(Session::authenticating())).await;

        let result = async {
            let registration = Registration::new(name, Email::new(email)?, password)?;
            self.inner.exchange.create_account(&registration).await
        }
        .await;

        self.complete(epoch, result).await
    }

    /// Sign out.
    ///
    /// The session always ends unauthenticated with no error, even if the
    /// stored token could not be deleted; that failure is reported in the
    /// returned outcome only.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> AuthOutcome {
        let _guard = self.inner.commit.lock().await;
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);

        let deleted = self.inner.store.delete(&self.inner.config.token_key).await;
        self.publish(Session::unauthenticated());

        match deleted {
            Ok(()) => {
                debug!("Signed out");
                AuthOutcome::succeeded()
            }
            Err(e) => {
                let err = Error::from(e);
                warn!(error = %err, "Signed out but the stored token could not be removed");
                AuthOutcome::failed(err.user_message())
            }
        }
    }

    /// Start a new operation: take the next epoch and optionally publish
    /// the in-flight state.
    async fn begin(&self, in_flight: Option<Session>) -> u64 {
        let _guard = self.inner.commit.lock().await;
        let epoch = self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(session) = in_flight {
            self.publish(session);
        }
        epoch
    }

    /// Apply the result of a login or registration.
    async fn complete(&self, epoch: u64, result: Result<AuthGrant>) -> AuthOutcome {
        let _guard = self.inner.commit.lock().await;

        if !self.is_current(epoch) {
            debug!("Discarding superseded result");
            return AuthOutcome::failed(SUPERSEDED);
        }

        let grant = match result {
            Ok(grant) => grant,
            Err(e) => return self.fail(e),
        };

        if let Err(e) = self
            .inner
            .store
            .set(&self.inner.config.token_key, grant.token.as_str())
            .await
        {
            return self.fail(e.into());
        }

        info!(user = %grant.user.id, "Signed in");
        self.publish(Session::authenticated(grant.user));
        AuthOutcome::succeeded()
    }

    fn fail(&self, err: Error) -> AuthOutcome {
        warn!(error = %err, kind = ?err.kind(), "Authentication failed");
        let message = err.user_message();
        self.publish(Session::failed(message.clone()));
        AuthOutcome::failed(message)
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.inner.epoch.load(Ordering::SeqCst) == epoch
    }

    fn publish(&self, session: Session) {
        self.inner.state.send_replace(session);
    }
}

impl<S, X> std::fmt::Debug for SessionManager<S, X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("config", &self.inner.config)
            .field("session", &*self.inner.state.borrow())
            .finish()
    }
}
