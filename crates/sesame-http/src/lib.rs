//! sesame-http - Credential exchange backed by an HTTP auth service.
//!
//! Talks to the `/api/auth/register`, `/api/auth/login` and `/api/auth/me`
//! routes of a JSON auth service.

mod client;
mod endpoints;
mod exchange;

pub use exchange::{HttpExchange, HttpExchangeBuilder};
