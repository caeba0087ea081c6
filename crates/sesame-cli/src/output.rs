//! Terminal output.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use sesame_core::{AuthStatus, User};

pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message to stderr.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg.red());
}

pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print the fields of a user record.
pub fn user(user: &User) {
    field("Name", &user.name);
    field("Email", user.email.as_str());
    field("ID", user.id.as_str());
}

pub fn status_label(status: AuthStatus) -> &'static str {
    match status {
        AuthStatus::Initializing => "initializing",
        AuthStatus::Unauthenticated => "unauthenticated",
        AuthStatus::Authenticating => "authenticating",
        AuthStatus::Authenticated => "authenticated",
        AuthStatus::Error => "error",
    }
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
