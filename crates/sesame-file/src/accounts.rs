//! Filesystem storage for local accounts and issued tokens.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use uuid::Uuid;

use sesame_core::error::{AuthError, Error, InvalidInputError, TransportError};
use sesame_core::{Email, Result, User, UserId};

use crate::fs_util::{LockGuard, write_atomic};

fn map_io(err: std::io::Error) -> Error {
    Error::Transport(TransportError::Http {
        message: format!("IO error: {}", err),
    })
}

fn map_json(err: serde_json::Error) -> Error {
    Error::InvalidInput(InvalidInputError::Other {
        message: err.to_string(),
    })
}

/// Account metadata stored in the local directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalAccount {
    /// The account identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address, unique across accounts.
    pub email: String,
    /// When the account was created.
    pub created_at: String,
    /// Password hash (bcrypt).
    pub password_hash: String,
}

impl LocalAccount {
    /// Convert into the public user record.
    pub fn to_user(&self) -> Result<User> {
        Ok(User::new(
            UserId::new(&self.id)?,
            self.name.clone(),
            Email::new(&self.email)?,
        ))
    }
}

/// A token issued to an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IssuedToken {
    user_id: String,
    issued_at: String,
}

/// Filesystem-backed storage for local accounts.
///
/// Layout under the root:
///
/// ```text
/// accounts/<id>/account.json
/// tokens/<token>.json
/// accounts.lock
/// ```
#[derive(Debug, Clone)]
pub struct AccountStore {
    root: PathBuf,
}

impl AccountStore {
    /// Create a new account store at the given root directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn accounts_dir(&self) -> PathBuf {
        self.root.join("accounts")
    }

    fn tokens_dir(&self) -> PathBuf {
        self.root.join("tokens")
    }

    fn lock_path(&self) -> PathBuf {
        self.root.join("accounts.lock")
    }

    fn account_path(&self, id: &str) -> PathBuf {
        self.accounts_dir().join(id).join("account.json")
    }

    /// Tokens double as file names, so anything outside `[A-Za-z0-9-]` is
    /// rejected before touching the filesystem.
    fn token_path(&self, token: &str) -> Result<PathBuf> {
        let safe = !token.is_empty()
            && token.len() <= 128
            && token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !safe {
            return Err(AuthError::TokenInvalid {
                reason: "malformed token".to_string(),
            }
            .into());
        }
        Ok(self.tokens_dir().join(format!("{}.json", token)))
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(map_io)?;
        serde_json::from_str(&content).map(Some).map_err(map_json)
    }

    fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        let content = serde_json::to_string_pretty(value).map_err(map_json)?;
        write_atomic(path, content.as_bytes(), true).map_err(map_io)
    }

    // ========================================================================
    // Account Management
    // ========================================================================

    /// Create an account. Fails if the email is already registered.
    #[instrument(skip(self, password_hash))]
    pub fn create_account(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<LocalAccount> {
        let _lock = LockGuard::acquire(&self.lock_path()).map_err(map_io)?;

        if self.find_account_by_email(email)?.is_some() {
            return Err(AuthError::AccountExists {
                email: email.to_string(),
            }
            .into());
        }

        let account = LocalAccount {
            id: Uuid::new_v4().simple().to_string()[..24].to_string(),
            name: name.to_string(),
            email: email.to_string(),
            created_at: Utc::now().to_rfc3339(),
            password_hash: password_hash.to_string(),
        };

        Self::write_json(&self.account_path(&account.id), &account)?;

        debug!(id = %account.id, "Created local account");

        Ok(account)
    }

    pub fn get_account(&self, id: &str) -> Result<Option<LocalAccount>> {
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Ok(None);
        }
        Self::read_json(&self.account_path(id))
    }

    pub fn list_accounts(&self) -> Result<Vec<LocalAccount>> {
        let accounts_dir = self.accounts_dir();

        if !accounts_dir.exists() {
            return Ok(Vec::new());
        }

        let mut accounts = Vec::new();

        for entry in fs::read_dir(&accounts_dir).map_err(map_io)? {
            let entry = entry.map_err(map_io)?;
            let account_file = entry.path().join("account.json");

            if account_file.exists() {
                let content = fs::read_to_string(&account_file).map_err(map_io)?;
                if let Ok(account) = serde_json::from_str::<LocalAccount>(&content) {
                    accounts.push(account);
                }
            }
        }

        Ok(accounts)
    }

    pub fn find_account_by_email(&self, email: &Email) -> Result<Option<LocalAccount>> {
        let accounts = self.list_accounts()?;
        Ok(accounts
            .into_iter()
            .find(|a| a.email.eq_ignore_ascii_case(email.as_str())))
    }

    // ========================================================================
    // Tokens
    // ========================================================================

    /// Issue a fresh token for an account.
    pub fn issue_token(&self, account: &LocalAccount) -> Result<String> {
        let token = Uuid::new_v4().to_string();
        let issued = IssuedToken {
            user_id: account.id.clone(),
            issued_at: Utc::now().to_rfc3339(),
        };
        Self::write_json(&self.token_path(&token)?, &issued)?;
        Ok(token)
    }

    /// Look up the account a token was issued to.
    ///
    /// Returns `TokenInvalid` for unknown tokens and for tokens whose
    /// account has since been removed.
    pub fn resolve_token(&self, token: &str) -> Result<LocalAccount> {
        let issued: IssuedToken =
            Self::read_json(&self.token_path(token)?)?.ok_or_else(|| AuthError::TokenInvalid {
                reason: "unknown token".to_string(),
            })?;

        self.get_account(&issued.user_id)?
            .ok_or_else(|| {
                AuthError::TokenInvalid {
                    reason: "account no longer exists".to_string(),
                }
                .into()
            })
    }

    /// Forget an issued token. Unknown tokens are ignored.
    pub fn revoke_token(&self, token: &str) -> Result<()> {
        let path = self.token_path(token)?;
        if path.exists() {
            fs::remove_file(&path).map_err(map_io)?;
        }
        Ok(())
    }
}
