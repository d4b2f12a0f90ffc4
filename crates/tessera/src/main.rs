//! `tessera` command-line entry point.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod logging;

use commands::{Context, config, start};

/// Tessera - server-side session manager
#[derive(Parser)]
#[command(name = "tessera", author, version, about, propagate_version = true)]
pub struct Cli {
    /// Log debug events from Tessera and the HTTP layer
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve sessions until interrupted
    Start(start::StartArgs),

    /// Inspect or create config files
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose);

    let ctx = Context {
        verbose: cli.verbose,
    };
    match cli.command {
        Commands::Start(args) => start::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx),
    }
}
