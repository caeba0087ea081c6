//! sesame-file - Filesystem-backed token store and credential exchange.
//!
//! [`FileTokenStore`] persists the session token across process restarts.
//! [`FileExchange`] serves accounts out of a local directory, which is handy
//! for offline development and tests.

mod accounts;
mod exchange;
mod fs_util;
mod token_store;

pub use accounts::{AccountStore, LocalAccount};
pub use exchange::FileExchange;
pub use token_store::FileTokenStore;
