//! Login and registration credentials.

use std::fmt;

use crate::error::{Error, InvalidInputError};
use crate::types::Email;

/// Login credentials: an email address and a password.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use sesame_core::{Credentials, Email};
///
/// let email = Email::new("alice@example.com").unwrap();
/// let creds = Credentials::new(email, "hunter2");
/// assert_eq!(creds.email().as_str(), "alice@example.com");
/// ```
#[derive(Clone)]
pub struct Credentials {
    email: Email,
    password: String,
}

impl Credentials {
    /// Create new credentials.
    pub fn new(email: Email, password: impl Into<String>) -> Self {
        Self {
            email,
            password: password.into(),
        }
    }

    /// Returns the email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Returns the password.
    ///
    /// # Security
    ///
    /// Use this only when constructing authentication requests.
    /// Never log or display this value.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Account registration details.
#[derive(Clone)]
pub struct Registration {
    name: String,
    credentials: Credentials,
}

impl Registration {
    /// Create a registration request.
    ///
    /// # Errors
    ///
    /// Returns an error if the display name is blank.
    pub fn new(
        name: impl Into<String>,
        email: Email,
        password: impl Into<String>,
    ) -> Result<Self, Error> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(InvalidInputError::Other {
                message: "name must not be empty".to_string(),
            }
            .into());
        }

        Ok(Self {
            name: trimmed.to_string(),
            credentials: Credentials::new(email, password),
        })
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the email address.
    pub fn email(&self) -> &Email {
        self.credentials.email()
    }

    /// Returns the password. Never log or display this value.
    pub fn password(&self) -> &str {
        self.credentials.password()
    }

    /// Returns the login credentials carried by this registration.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", self.credentials.email())
            .field("password", &"[REDACTED]")
            .finish()
    }
}
