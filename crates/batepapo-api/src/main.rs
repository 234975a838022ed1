//! Batepapo CLI and REST API entry point.
//!
//! Binary name: `batepapo`
//!
//! Parses CLI arguments, initializes database and services, then dispatches
//! to the appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise derive from verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn,batepapo=info",
        1 => "info,batepapo=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let state = AppState::init().await?;
    tracing::debug!(data_dir = %state.data_dir.display(), "application state ready");

    match cli.command {
        Commands::Serve { port, host } => {
            cli::serve::serve(state, host, port).await?;
        }

        Commands::Participants => {
            cli::participants::list_participants(&state, cli.json).await?;
        }

        Commands::Sweep { timeout_secs } => {
            cli::sweep::sweep_once(&state, timeout_secs, cli.json).await?;
        }
    }

    Ok(())
}
