//! Credential exchange backed by a local account directory.

use std::path::Path;

use async_trait::async_trait;
use bcrypt::{DEFAULT_COST, hash, verify};
use tracing::{debug, instrument};

use sesame_core::error::{AuthError, Error, InvalidInputError};
use sesame_core::{
    AuthGrant, AuthToken, CredentialExchange, Credentials, Registration, Result, User,
};

use crate::accounts::{AccountStore, LocalAccount};

fn map_bcrypt(err: bcrypt::BcryptError) -> Error {
    Error::InvalidInput(InvalidInputError::Other {
        message: err.to_string(),
    })
}

/// Filesystem-backed credential exchange.
///
/// Passwords are stored as bcrypt hashes; tokens are random UUIDs recorded
/// next to the accounts.
#[derive(Debug, Clone)]
pub struct FileExchange {
    store: AccountStore,
    cost: u32,
}

impl FileExchange {
    /// Create a new file-backed exchange at the given root directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            store: AccountStore::new(root),
            cost: DEFAULT_COST,
        }
    }

    /// Override the bcrypt cost used for new accounts.
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    /// Revoke a previously issued token.
    pub fn revoke_token(&self, token: &AuthToken) -> Result<()> {
        self.store.revoke_token(token.as_str())
    }

    fn grant(&self, account: &LocalAccount) -> Result<AuthGrant> {
        let token = self.store.issue_token(account)?;
        Ok(AuthGrant {
            token: AuthToken::new(token),
            user: account.to_user()?,
        })
    }
}

#[async_trait]
impl CredentialExchange for FileExchange {
    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthGrant> {
        // Same message for unknown account and wrong password.
        let rejected = || AuthError::InvalidCredentials("Invalid email or password".to_string());

        let account = self
            .store
            .find_account_by_email(credentials.email())?
            .ok_or_else(rejected)?;

        let ok = verify(credentials.password(), &account.password_hash).map_err(map_bcrypt)?;
        if !ok {
            return Err(rejected().into());
        }

        debug!(id = %account.id, "Local login accepted");
        self.grant(&account)
    }

    #[instrument(skip(self, registration), fields(email = %registration.email()))]
    async fn create_account(&self, registration: &Registration) -> Result<AuthGrant> {
        if registration.password().is_empty() {
            return Err(InvalidInputError::Other {
                message: "password must not be empty".to_string(),
            }
            .into());
        }

        let password_hash = hash(registration.password(), self.cost).map_err(map_bcrypt)?;
        let account =
            self.store
                .create_account(registration.name(), registration.email(), &password_hash)?;

        self.grant(&account)
    }

    #[instrument(skip(self, token))]
    async fn validate_token(&self, token: &AuthToken) -> Result<User> {
        self.store.resolve_token(token.as_str())?.to_user()
    }
}
