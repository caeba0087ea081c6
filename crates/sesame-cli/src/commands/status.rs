//! Status command implementation.

use anyhow::Result;
use clap::Args;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print the session snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

/// Restores the stored session and reports it. Exits zero in every state.
pub async fn run(ctx: &Context, args: StatusArgs) -> Result<()> {
    let session = ctx.restored_manager().await.snapshot();

    if args.json {
        output::json_pretty(&session)?;
        return Ok(());
    }

    output::field("Service", ctx.service().as_str());
    output::field("Status", output::status_label(session.status()));
    if let Some(user) = session.user() {
        output::user(user);
    }
    if let Some(error) = session.error() {
        output::field("Error", error);
    }

    Ok(())
}
