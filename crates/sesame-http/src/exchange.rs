//! HTTP-backed credential exchange.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use sesame_core::error::{AuthError, Error};
use sesame_core::{
    AuthGrant, AuthToken, CredentialExchange, Credentials, Registration, Result, ServiceUrl, User,
};

use crate::client::HttpClient;
use crate::endpoints::*;

/// Request timeout used unless the builder overrides it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A credential exchange that talks JSON to an auth service.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use sesame_core::ServiceUrl;
/// use sesame_http::HttpExchange;
///
/// # fn example() -> sesame_core::Result<()> {
/// let service = ServiceUrl::new("https://auth.example.com")?;
/// let exchange = HttpExchange::builder(service)
///     .timeout(Duration::from_secs(5))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpExchange {
    client: HttpClient,
}

impl HttpExchange {
    /// Create an exchange with default settings.
    pub fn new(service: ServiceUrl) -> Result<Self> {
        Self::builder(service).build()
    }

    pub fn builder(service: ServiceUrl) -> HttpExchangeBuilder {
        HttpExchangeBuilder {
            service,
            prefix: DEFAULT_PREFIX.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            user_agent: concat!("sesame/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Returns the service URL for this exchange.
    pub fn service(&self) -> &ServiceUrl {
        self.client.service()
    }
}

/// Builder for [`HttpExchange`].
#[derive(Debug, Clone)]
pub struct HttpExchangeBuilder {
    service: ServiceUrl,
    prefix: String,
    timeout: Option<Duration>,
    user_agent: String,
}

impl HttpExchangeBuilder {
    /// Route prefix the auth endpoints live under (default `api/auth`).
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Per-request timeout. `None` disables it.
    pub fn timeout(mut self, timeout: impl Into<Option<Duration>>) -> Self {
        self.timeout = timeout.into();
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Result<HttpExchange> {
        let client = HttpClient::new(self.service, &self.prefix, self.timeout, &self.user_agent)?;
        Ok(HttpExchange { client })
    }
}

/// Login/register rejections are credential problems, not outages. Any
/// other status (a missing route included) stays a protocol error.
fn credential_error(err: Error) -> Error {
    match err {
        Error::Protocol(p) if matches!(p.status, 400 | 401 | 403) => {
            let message = p
                .message
                .unwrap_or_else(|| "invalid email or password".to_string());
            AuthError::InvalidCredentials(message).into()
        }
        other => other,
    }
}

#[async_trait]
impl CredentialExchange for HttpExchange {
    #[instrument(skip(self, credentials), fields(email = %credentials.email()))]
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthGrant> {
        let request = LoginRequest {
            email: credentials.email().as_str(),
            password: credentials.password(),
        };

        let response: AuthResponse = self
            .client
            .post(LOGIN, &request)
            .await
            .map_err(credential_error)?;

        debug!("Login accepted");
        Ok(AuthGrant {
            token: AuthToken::new(response.token),
            user: response.user.into_user(200)?,
        })
    }

    #[instrument(skip(self, registration), fields(email = %registration.email()))]
    async fn create_account(&self, registration: &Registration) -> Result<AuthGrant> {
        let request = RegisterRequest {
            name: registration.name(),
            email: registration.email().as_str(),
            password: registration.password(),
        };

        let response: AuthResponse = self
            .client
            .post(REGISTER, &request)
            .await
            .map_err(|err| match err {
                Error::Protocol(p) if p.status == 409 => AuthError::AccountExists {
                    email: registration.email().to_string(),
                }
                .into(),
                other => credential_error(other),
            })?;

        debug!("Account created");
        Ok(AuthGrant {
            token: AuthToken::new(response.token),
            user: response.user.into_user(201)?,
        })
    }

    #[instrument(skip(self, token))]
    async fn validate_token(&self, token: &AuthToken) -> Result<User> {
        let response: MeResponse =
            self.client
                .get_authed(ME, token.as_str())
                .await
                .map_err(|err| match err {
                    Error::Protocol(p) if p.is_auth_error() => AuthError::TokenInvalid {
                        reason: p.message.unwrap_or_else(|| format!("HTTP {}", p.status)),
                    }
                    .into(),
                    other => other,
                })?;

        response.user.into_user(200)
    }
}
