//! Error types for sesame.
//!
//! Every failure a credential exchange or token store can produce maps onto
//! one of four kinds (see [`ErrorKind`]). The session manager never lets any
//! of them escape; they surface as a message on the session instead.

use std::fmt;
use thiserror::Error;

/// The unified error type for sesame operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (bad credentials, rejected token).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Unexpected responses from the auth service.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The persistent token store could not be read or written.
    #[error("token store error: {0}")]
    Store(#[from] StoreError),

    /// Input validation errors (malformed email, empty name, bad URL).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Credentials or input were rejected.
    ValidationFailure,
    /// The credential exchange could not be reached or misbehaved.
    NetworkFailure,
    /// A stored token is stale or corrupt.
    TokenInvalid,
    /// The persistent token store is unavailable.
    StoreFailure,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport(_) | Error::Protocol(_) => ErrorKind::NetworkFailure,
            Error::Auth(AuthError::TokenInvalid { .. }) => ErrorKind::TokenInvalid,
            Error::Auth(_) | Error::InvalidInput(_) => ErrorKind::ValidationFailure,
            Error::Store(_) => ErrorKind::StoreFailure,
        }
    }

    /// Returns true if the error means a stored token must be discarded.
    pub fn is_token_rejection(&self) -> bool {
        self.kind() == ErrorKind::TokenInvalid
    }

    /// A short message suitable for showing to an end user.
    ///
    /// Server-provided messages win over the generic description.
    pub fn user_message(&self) -> String {
        match self {
            Error::Auth(AuthError::InvalidCredentials(message)) => message.clone(),
            Error::Auth(AuthError::TokenInvalid { reason }) => {
                format!("session expired: {}", reason)
            }
            Error::Protocol(ProtocolError {
                message: Some(message),
                ..
            }) => message.clone(),
            Error::InvalidInput(err) => err.to_string(),
            other => other.to_string(),
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// TLS/SSL error.
    #[error("TLS error: {message}")]
    Tls { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Generic HTTP or I/O error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid credentials provided.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// An account with this email is already registered.
    #[error("account already exists: {email}")]
    AccountExists { email: String },

    /// The token was rejected by the credential exchange.
    #[error("token invalid: {reason}")]
    TokenInvalid { reason: String },
}

/// Errors raised by a [`TokenStore`](crate::TokenStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing storage could not be accessed.
    #[error("storage unavailable: {message}")]
    Unavailable { message: String },

    /// The stored data could not be decoded.
    #[error("corrupt store: {message}")]
    Corrupt { message: String },
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Unavailable {
            message: err.to_string(),
        }
    }
}

/// Unexpected responses from the auth service.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Error code (if present).
    pub error: Option<String>,
    /// Error message from the server.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref error) = self.error {
            write!(f, " [{}]", error)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, error: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            error,
            message,
        }
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid email address.
    #[error("invalid email '{value}': {reason}")]
    Email { value: String, reason: String },

    /// Invalid user identifier.
    #[error("invalid user id '{value}': {reason}")]
    UserId { value: String, reason: String },

    /// Invalid service URL.
    #[error("invalid service URL '{value}': {reason}")]
    ServiceUrl { value: String, reason: String },

    /// Generic invalid input.
    #[error("{message}")]
    Other { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_error_kinds() {
        let err: Error = AuthError::InvalidCredentials("nope".into()).into();
        assert_eq!(err.kind(), ErrorKind::ValidationFailure);

        let err: Error = TransportError::Timeout { duration_ms: 10 }.into();
        assert_eq!(err.kind(), ErrorKind::NetworkFailure);

        let err: Error = AuthError::TokenInvalid {
            reason: "expired".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::TokenInvalid);
        assert!(err.is_token_rejection());

        let err: Error = StoreError::Unavailable {
            message: "disk".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::StoreFailure);
    }

    #[test]
    fn user_message_prefers_server_message() {
        let err: Error = ProtocolError::new(500, None, Some("database offline".into())).into();
        assert_eq!(err.user_message(), "database offline");

        let err: Error = ProtocolError::new(502, None, None).into();
        assert_eq!(err.user_message(), "protocol error: HTTP 502");
    }

    #[test]
    fn protocol_error_display() {
        let err = ProtocolError::new(401, Some("Unauthorized".into()), Some("bad token".into()));
        assert_eq!(err.to_string(), "HTTP 401 [Unauthorized]: bad token");
        assert!(err.is_auth_error());
    }
}
