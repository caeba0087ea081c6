//! Email address type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A validated email address.
///
/// Validation is deliberately shallow: one `@`, a non-empty local part, a
/// dotted domain and no whitespace. The domain is lowercased; the local part
/// is kept as given.
///
/// # Example
///
/// ```
/// use sesame_core::Email;
///
/// let email = Email::new("Alice@Example.COM").unwrap();
/// assert_eq!(email.as_str(), "Alice@example.com");
/// assert_eq!(email.domain(), "example.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Create a new email address, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a plausible email address.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref().trim();
        let (local, domain) = Self::validate(s)?;
        Ok(Self(format!("{}@{}", local, domain.to_ascii_lowercase())))
    }

    /// Returns the part before the `@`.
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map(|(l, _)| l).unwrap_or("")
    }

    /// Returns the domain part.
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map(|(_, d)| d).unwrap_or("")
    }

    /// Returns the full address.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(&str, &str), Error> {
        let invalid = |reason: &str| -> Error {
            InvalidInputError::Email {
                value: s.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        if s.is_empty() {
            return Err(invalid("must not be empty"));
        }

        if s.chars().any(char::is_whitespace) {
            return Err(invalid("must not contain whitespace"));
        }

        let (local, domain) = s.split_once('@').ok_or_else(|| invalid("missing '@'"))?;

        if domain.contains('@') {
            return Err(invalid("must contain exactly one '@'"));
        }

        if local.is_empty() {
            return Err(invalid("missing local part"));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(invalid("domain must contain a '.'"));
        }

        if domain.starts_with('.') || domain.ends_with('.') || domain.contains("..") {
            return Err(invalid("malformed domain"));
        }

        Ok((local, domain))
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Email {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Email {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
