//! Session snapshots.

use serde::Serialize;

use crate::types::User;

/// Where the session sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    /// The manager has not yet looked for a stored token.
    Initializing,
    /// No user is signed in.
    Unauthenticated,
    /// A restore, login or registration is in flight.
    Authenticating,
    /// A user is signed in.
    Authenticated,
    /// No user is signed in and the last attempt failed.
    Error,
}

/// The authentication state of the running client.
///
/// Snapshots are immutable; only the
/// [`SessionManager`](crate::SessionManager) produces new ones. The
/// constructors keep `loading`, `user` and `error` consistent with the
/// status: `loading` holds exactly while an operation is in flight and
/// `user` is present exactly when authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    user: Option<User>,
    loading: bool,
    error: Option<String>,
    status: AuthStatus,
}

impl Session {
    pub(crate) fn initializing() -> Self {
        Self {
            user: None,
            loading: true,
            error: None,
            status: AuthStatus::Initializing,
        }
    }

    pub(crate) fn unauthenticated() -> Self {
        Self {
            user: None,
            loading: false,
            error: None,
            status: AuthStatus::Unauthenticated,
        }
    }

    pub(crate) fn authenticating() -> Self {
        Self {
            user: None,
            loading: true,
            error: None,
            status: AuthStatus::Authenticating,
        }
    }

    pub(crate) fn authenticated(user: User) -> Self {
        Self {
            user: Some(user),
            loading: false,
            error: None,
            status: AuthStatus::Authenticated,
        }
    }

    pub(crate) fn failed(error: impl Into<String>) -> Self {
        Self {
            user: None,
            loading: false,
            error: Some(error.into()),
            status: AuthStatus::Error,
        }
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// True while restore, login or registration is in flight.
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Message from the last failed attempt.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn status(&self) -> AuthStatus {
        self.status
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}
