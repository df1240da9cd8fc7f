//! gitauth CLI binary entry point.

use gitauth::cli::{Cli, Commands};
use gitauth::config::GitAuthConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("GITAUTH_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();

    let result = match GitAuthConfig::load() {
        Ok(config) => match cli.command {
            Commands::Login(args) => gitauth::cli::auth::handle_login(&args, &config).await,
            Commands::Status => gitauth::cli::auth::handle_status(&config).await,
            Commands::Logout(args) => {
                gitauth::cli::auth::handle_logout(&args.provider, &config).await
            }
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
