//! Core identity types.
//!
//! These types enforce their invariants at construction time,
//! ensuring invalid states are unrepresentable.

mod email;
mod service_url;
mod user;

pub use email::Email;
pub use service_url::ServiceUrl;
pub use user::{User, UserId};
