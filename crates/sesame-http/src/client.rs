//! JSON HTTP client for the auth service.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use sesame_core::ServiceUrl;
use sesame_core::error::{Error, InvalidInputError, ProtocolError, TransportError};

use crate::endpoints::ErrorBody;

/// HTTP client bound to one auth service and route prefix.
#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    client: reqwest::Client,
    service: ServiceUrl,
    prefix: String,
    timeout: Option<Duration>,
}

impl HttpClient {
    pub fn new(
        service: ServiceUrl,
        prefix: &str,
        timeout: Option<Duration>,
        user_agent: &str,
    ) -> Result<Self, Error> {
        if !service.is_network() {
            return Err(InvalidInputError::ServiceUrl {
                value: service.to_string(),
                reason: "HTTP exchange requires an http(s) URL".to_string(),
            }
            .into());
        }

        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| TransportError::Tls {
            message: e.to_string(),
        })?;

        Ok(Self {
            client,
            service,
            prefix: prefix.trim_matches('/').to_string(),
            timeout,
        })
    }

    pub fn service(&self) -> &ServiceUrl {
        &self.service
    }

    fn url(&self, route: &str) -> String {
        if self.prefix.is_empty() {
            self.service.endpoint_url(route)
        } else {
            self.service
                .endpoint_url(&format!("{}/{}", self.prefix, route))
        }
    }

    /// POST a JSON body and decode the JSON response.
    #[instrument(skip(self, body), fields(service = %self.service))]
    pub async fn post<B, R>(&self, route: &str, body: &B) -> Result<R, Error>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.url(route);
        debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport(e))?;

        self.handle_response(response).await
    }

    /// GET with a bearer token and decode the JSON response.
    #[instrument(skip(self, token), fields(service = %self.service))]
    pub async fn get_authed<R>(&self, route: &str, token: &str) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        let url = self.url(route);
        debug!(%url, "GET (authenticated)");

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| self.transport(e))?;

        self.handle_response(response).await
    }

    async fn handle_response<R: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<R, Error> {
        let status = response.status();
        trace!(status = %status, "Auth service response");

        let bytes = response.bytes().await.map_err(|e| self.transport(e))?;

        if status.is_success() {
            serde_json::from_slice::<R>(&bytes).map_err(|e| {
                ProtocolError::new(
                    status.as_u16(),
                    Some("InvalidResponse".to_string()),
                    Some(e.to_string()),
                )
                .into()
            })
        } else {
            Err(Self::parse_error(status, &bytes).into())
        }
    }

    fn parse_error(status: StatusCode, bytes: &[u8]) -> ProtocolError {
        let body: ErrorBody = serde_json::from_slice(bytes).unwrap_or_default();
        // Express handlers often put the human message in `error`.
        let (error, message) = match (body.error, body.message) {
            (Some(error), None) => (None, Some(error)),
            other => other,
        };
        ProtocolError::new(status.as_u16(), error, message)
    }

    fn transport(&self, err: reqwest::Error) -> Error {
        let err = if err.is_timeout() {
            TransportError::Timeout {
                duration_ms: self.timeout.map(|t| t.as_millis() as u64).unwrap_or(0),
            }
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        };
        err.into()
    }
}
