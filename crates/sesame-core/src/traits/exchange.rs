//! Credential exchange trait.

use async_trait::async_trait;

use crate::types::User;
use crate::{AuthToken, Credentials, Registration, Result};

/// Output from a successful login or registration.
#[derive(Debug, Clone)]
pub struct AuthGrant {
    /// The token proving this authentication.
    pub token: AuthToken,
    /// The authenticated user.
    pub user: User,
}

/// An external service that turns credentials into a token/user pair.
#[async_trait]
pub trait CredentialExchange: Send + Sync {
    /// Exchange login credentials for a token.
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthGrant>;

    /// Create a new account and sign it in.
    async fn create_account(&self, registration: &Registration) -> Result<AuthGrant>;

    /// Resolve a previously issued token back to its user.
    ///
    /// Implementations return [`AuthError::TokenInvalid`](crate::error::AuthError::TokenInvalid)
    /// when the service rejects the token itself, so callers can tell a
    /// stale token apart from an unreachable service.
    async fn validate_token(&self, token: &AuthToken) -> Result<User>;
}
