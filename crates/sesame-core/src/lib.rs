//! sesame-core - Core authentication types, traits and the session manager.
//!
//! The [`SessionManager`] is the single writer of authentication state. It
//! drives login, registration, logout and startup restoration against a
//! [`CredentialExchange`] and persists the resulting token in a
//! [`TokenStore`]. Consumers observe immutable [`Session`] snapshots.
//!
//! # Example
//!
//! ```no_run
//! use sesame_core::{CredentialExchange, ManagerConfig, MemoryTokenStore, SessionManager};
//!
//! # async fn example<X: CredentialExchange + 'static>(exchange: X) {
//! let manager = SessionManager::start(MemoryTokenStore::new(), exchange, ManagerConfig::default()).await;
//!
//! let outcome = manager.login("alice@example.com", "hunter2").await;
//! if outcome.success {
//!     println!("Logged in as {:?}", manager.snapshot().user());
//! }
//! # }
//! ```

pub mod credentials;
pub mod error;
pub mod manager;
pub mod session;
pub mod store;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credentials::{Credentials, Registration};
pub use error::{Error, ErrorKind};
pub use manager::{AuthOutcome, ManagerConfig, SessionManager};
pub use session::{AuthStatus, Session};
pub use store::MemoryTokenStore;
pub use tokens::AuthToken;
pub use traits::{AuthGrant, CredentialExchange, TokenStore};
pub use types::{Email, ServiceUrl, User, UserId};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
