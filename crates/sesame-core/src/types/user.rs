//! User identity record.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, InvalidInputError};

use super::Email;

/// An opaque, non-empty user identifier assigned by the credential exchange.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a user identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is empty or contains whitespace.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(InvalidInputError::UserId {
                value: s,
                reason: "must be non-empty and contain no whitespace".to_string(),
            }
            .into());
        }
        Ok(Self(s))
    }

    /// Returns the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// The authenticated user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identifier assigned by the credential exchange.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address the account is registered under.
    pub email: Email,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>, email: Email) -> Self {
        Self {
            id,
            name: name.into(),
            email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_id_rejects_empty() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new("a b").is_err());
        assert_eq!(UserId::new("64f1c2").unwrap().as_str(), "64f1c2");
    }

    #[test]
    fn user_deserializes_and_validates() {
        let user: User = serde_json::from_value(json!({
            "id": "1",
            "name": "User",
            "email": "user@example.com"
        }))
        .unwrap();
        assert_eq!(user.email.as_str(), "user@example.com");

        let bad = serde_json::from_value::<User>(json!({
            "id": "1",
            "name": "User",
            "email": "not-an-email"
        }));
        assert!(bad.is_err());
    }
}
