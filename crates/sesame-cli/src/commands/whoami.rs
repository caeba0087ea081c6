//! Whoami command implementation.

use anyhow::{Result, bail};
use clap::Args;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub async fn run(ctx: &Context, _args: WhoamiArgs) -> Result<()> {
    let session = ctx.restored_manager().await.snapshot();

    let Some(user) = session.user() else {
        match session.error() {
            Some(error) => bail!("Not logged in: {}", error),
            None => bail!("Not logged in. Run 'sesame login' first."),
        }
    };

    output::user(user);
    output::field("Service", ctx.service().as_str());

    Ok(())
}
