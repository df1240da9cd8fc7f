//! CLI entry point for gitauth.

pub mod auth;

use clap::{Parser, Subcommand};

/// gitauth CLI
#[derive(Parser, Debug)]
#[command(name = "gitauth", version, about = "Authenticate with a Git provider using the device flow")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the device authorization dialog and store the token
    Login(LoginArgs),
    /// Show stored provider tokens
    Status,
    /// Remove the stored token for a provider
    Logout(LogoutArgs),
}

/// Arguments for `gitauth login`.
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Repository the token is requested for (display only)
    #[arg(short, long)]
    pub repo: String,

    /// Git provider (github)
    #[arg(short, long, default_value = "github")]
    pub provider: String,

    /// Print the token to stdout after a successful login
    #[arg(long)]
    pub print_token: bool,
}

/// Arguments for `gitauth logout`.
#[derive(Parser, Debug)]
pub struct LogoutArgs {
    /// Git provider (github, gitlab)
    #[arg(short, long, default_value = "github")]
    pub provider: String,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
