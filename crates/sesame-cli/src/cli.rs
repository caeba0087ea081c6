//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};

use crate::commands::{login, logout, register, status, whoami};

/// Sign in to a sesame auth service and inspect the stored session.
#[derive(Parser, Debug)]
#[command(name = "sesame")]
#[command(author, version = env!("SESAME_VERSION"), about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Auth service base URL (http(s):// or file:// for a local account directory)
    #[arg(
        long,
        global = true,
        env = "SESAME_SERVICE",
        default_value = "http://localhost:5000"
    )]
    pub service: String,

    /// Seconds to wait for the service when checking a stored token
    #[arg(long, global = true, value_name = "SECS", default_value_t = 10)]
    pub restore_timeout: u64,

    /// bcrypt cost for accounts created in a local account directory
    #[arg(long, global = true, env = "SESAME_BCRYPT_COST", hide = true)]
    pub bcrypt_cost: Option<u32>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in with email and password
    Login(login::LoginArgs),

    /// Create an account and sign in
    Register(register::RegisterArgs),

    /// Sign out and forget the stored token
    Logout(logout::LogoutArgs),

    /// Show the signed-in user
    Whoami(whoami::WhoamiArgs),

    /// Show the session state after restoring the stored token
    Status(status::StatusArgs),
}
