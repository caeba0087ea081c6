//! Register command implementation.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Display name for the new account
    #[arg(long)]
    pub name: String,

    /// Email address for the new account
    #[arg(long)]
    pub email: String,

    /// Password for the new account
    #[arg(long)]
    pub password: String,
}

pub async fn run(ctx: &Context, args: RegisterArgs) -> Result<()> {
    eprintln!("{}", "Creating account...".dimmed());

    let manager = ctx.manager();
    let outcome = manager
        .register(&args.name, &args.email, &args.password)
        .await;
    if let Some(error) = outcome.error {
        bail!("Registration failed: {}", error);
    }

    output::success("Account created");
    println!();
    if let Some(user) = manager.user() {
        output::user(&user);
    }
    output::field("Service", ctx.service().as_str());

    Ok(())
}
