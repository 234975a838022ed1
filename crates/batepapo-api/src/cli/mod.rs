//! CLI command definitions and dispatch for the `batepapo` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod participants;
pub mod serve;
pub mod sweep;

use clap::{Parser, Subcommand};

/// Minimal chat room server.
#[derive(Parser)]
#[command(name = "batepapo", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server and the presence sweeper.
    Serve {
        /// Port to listen on (defaults to config.toml, then 5000).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to config.toml, then 0.0.0.0).
        #[arg(long)]
        host: Option<String>,
    },

    /// List participants currently in the room.
    #[command(alias = "who")]
    Participants,

    /// Run one presence sweep now and report who was evicted.
    Sweep {
        /// Inactivity timeout in seconds (defaults to config.toml, then 10).
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_serve_overrides() {
        let cli = Cli::try_parse_from(["batepapo", "serve", "--port", "8080", "--host", "127.0.0.1"])
            .unwrap();
        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(port, Some(8080));
                assert_eq!(host.as_deref(), Some("127.0.0.1"));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["batepapo", "sweep", "--timeout-secs", "30", "--json", "-vv"])
            .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Sweep { timeout_secs: Some(30) }));
    }

    #[test]
    fn test_cli_verify() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }
}
