//! Trait seams between the session manager and its collaborators.

mod exchange;
mod store;

pub use exchange::{AuthGrant, CredentialExchange};
pub use store::TokenStore;
