//! Login command implementation.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email address
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,
}

pub async fn run(ctx: &Context, args: LoginArgs) -> Result<()> {
    eprintln!("{}", "Logging in...".dimmed());

    let manager = ctx.manager();
    let outcome = manager.login(&args.email, &args.password).await;
    if let Some(error) = outcome.error {
        bail!("Login failed: {}", error);
    }

    output::success("Logged in successfully");
    println!();
    if let Some(user) = manager.user() {
        output::user(&user);
    }
    output::field("Service", ctx.service().as_str());

    Ok(())
}
