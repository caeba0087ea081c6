//! Wiring from command-line options to a session manager.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use directories::ProjectDirs;
use tracing::{debug, instrument};

use sesame_core::{
    AuthGrant, AuthToken, CredentialExchange, Credentials, ManagerConfig, Registration,
    ServiceUrl, SessionManager, TokenStore, User,
};
use sesame_file::{FileExchange, FileTokenStore};
use sesame_http::HttpExchange;

use crate::cli::GlobalArgs;

/// The exchange selected by the service URL scheme.
#[derive(Debug, Clone)]
pub enum CliExchange {
    File(FileExchange),
    Http(HttpExchange),
}

impl CliExchange {
    fn for_service(service: &ServiceUrl, bcrypt_cost: Option<u32>) -> Result<Self> {
        if service.is_local() {
            let root = service
                .to_file_path()
                .context("Failed to convert file:// URL to path")?;
            let mut exchange = FileExchange::new(root);
            if let Some(cost) = bcrypt_cost {
                exchange = exchange.with_cost(cost);
            }
            Ok(CliExchange::File(exchange))
        } else {
            let exchange =
                HttpExchange::new(service.clone()).context("Failed to set up HTTP client")?;
            Ok(CliExchange::Http(exchange))
        }
    }
}

#[async_trait]
impl CredentialExchange for CliExchange {
    async fn authenticate(&self, credentials: &Credentials) -> sesame_core::Result<AuthGrant> {
        match self {
            CliExchange::File(exchange) => exchange.authenticate(credentials).await,
            CliExchange::Http(exchange) => exchange.authenticate(credentials).await,
        }
    }

    async fn create_account(&self, registration: &Registration) -> sesame_core::Result<AuthGrant> {
        match self {
            CliExchange::File(exchange) => exchange.create_account(registration).await,
            CliExchange::Http(exchange) => exchange.create_account(registration).await,
        }
    }

    async fn validate_token(&self, token: &AuthToken) -> sesame_core::Result<User> {
        match self {
            CliExchange::File(exchange) => exchange.validate_token(token).await,
            CliExchange::Http(exchange) => exchange.validate_token(token).await,
        }
    }
}

pub type CliManager = SessionManager<FileTokenStore, CliExchange>;

/// Resolved settings shared by every command.
#[derive(Debug)]
pub struct Context {
    service: ServiceUrl,
    exchange: CliExchange,
    store: FileTokenStore,
    config: ManagerConfig,
}

impl Context {
    pub fn from_args(args: &GlobalArgs) -> Result<Self> {
        let service = ServiceUrl::new(&args.service).context("Invalid service URL")?;
        let exchange = CliExchange::for_service(&service, args.bcrypt_cost)?;
        let store = FileTokenStore::new(session_path()?);
        debug!(service = %service, path = %store.path().display(), "Resolved session settings");

        // One token per service, so switching --service never sends a token
        // to a service that did not issue it.
        let config = ManagerConfig {
            token_key: token_key(&service),
            restore_timeout: Duration::from_secs(args.restore_timeout),
        };

        Ok(Self {
            service,
            exchange,
            store,
            config,
        })
    }

    pub fn service(&self) -> &ServiceUrl {
        &self.service
    }

    /// A manager that has not looked at the stored token yet.
    pub fn manager(&self) -> CliManager {
        SessionManager::new(
            self.store.clone(),
            self.exchange.clone(),
            self.config.clone(),
        )
    }

    /// Revoke the stored token at a local account directory so it stops
    /// resolving. HTTP services expose no revocation route.
    #[instrument(skip(self), fields(service = %self.service))]
    pub async fn revoke_stored_token(&self) -> Result<()> {
        let CliExchange::File(exchange) = &self.exchange else {
            return Ok(());
        };
        let Some(token) = self.store.get(&self.config.token_key).await? else {
            return Ok(());
        };

        exchange.revoke_token(&AuthToken::new(token))?;
        debug!("Revoked local token");
        Ok(())
    }

    /// A manager with the stored session restored.
    pub async fn restored_manager(&self) -> CliManager {
        SessionManager::start(
            self.store.clone(),
            self.exchange.clone(),
            self.config.clone(),
        )
        .await
    }
}

fn token_key(service: &ServiceUrl) -> String {
    format!("{}@{}", sesame_core::manager::DEFAULT_TOKEN_KEY, service)
}

fn session_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "sesame").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("session.json"))
}
