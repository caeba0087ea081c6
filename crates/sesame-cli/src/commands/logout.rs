//! Logout command implementation.

use anyhow::{Result, bail};
use clap::Args;
use tracing::warn;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub async fn run(ctx: &Context, _args: LogoutArgs) -> Result<()> {
    if let Err(e) = ctx.revoke_stored_token().await {
        warn!(error = %e, "Could not revoke token");
    }

    let outcome = ctx.manager().logout().await;
    if let Some(error) = outcome.error {
        bail!("Logged out, but the stored token could not be removed: {}", error);
    }

    output::success("Logged out");
    Ok(())
}
