//! Auth service routes and request/response types.

use serde::{Deserialize, Serialize};

use sesame_core::error::{Error, ProtocolError};
use sesame_core::{Email, User, UserId};

// ============================================================================
// Routes
// ============================================================================

/// Route prefix the auth router is mounted under.
pub const DEFAULT_PREFIX: &str = "api/auth";

/// POST, creates an account.
pub const REGISTER: &str = "register";

/// POST, exchanges credentials for a token.
pub const LOGIN: &str = "login";

/// GET, resolves a bearer token to its user.
pub const ME: &str = "me";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for login.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Request body for register.
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Response from login and register.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserBody,
}

/// Response from me. The user may be returned as `user` or `data`.
#[derive(Debug, Deserialize)]
pub struct MeResponse {
    #[serde(alias = "data")]
    pub user: UserBody,
}

/// A user record as the service returns it.
#[derive(Debug, Deserialize)]
pub struct UserBody {
    #[serde(alias = "_id")]
    pub id: RawId,
    pub name: String,
    pub email: String,
}

/// Identifiers arrive as strings (document ids) or numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(u64),
}

impl UserBody {
    /// Validate into a [`User`].
    ///
    /// A body that fails validation is the service's fault, so it is
    /// reported as a protocol error rather than an input error.
    pub fn into_user(self, status: u16) -> Result<User, Error> {
        let id = match self.id {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        };

        let invalid = |e: Error| -> Error {
            ProtocolError::new(status, Some("InvalidResponse".into()), Some(e.to_string())).into()
        };

        let id = UserId::new(id).map_err(invalid)?;
        let email = Email::new(&self.email).map_err(invalid)?;
        Ok(User::new(id, self.name, email))
    }
}

/// Error body returned by the service.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
