//! Start command - launches the Tessera session server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::Args;
use tokio_util::sync::CancellationToken;

use tessera_config::TesseraConfig;
use tessera_server::{Server, ServerConfig};
use tessera_session::{Manager, ProviderRegistry};

use super::Context;

/// Arguments for the start command.
///
/// CLI arguments override config file values.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind to (overrides config)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Cookie carrying the session token (overrides config)
    #[arg(long)]
    pub cookie_name: Option<String>,

    /// Idle session lifetime in seconds (overrides config)
    #[arg(long)]
    pub max_lifetime: Option<u64>,

    /// Load this config file instead of discovering one
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Run the start command.
pub async fn run(args: StartArgs, ctx: &Context) -> Result<()> {
    let config = load(&args, ctx)?;
    let server_cfg = config.server();
    let mut session_cfg = config.session();

    // ── CLI overrides ──────────────────────────────────────────────────
    if let Some(name) = args.cookie_name {
        session_cfg.cookie_name = name;
    }
    if let Some(secs) = args.max_lifetime {
        session_cfg.max_lifetime = Duration::from_secs(secs);
    }

    let port = args.port.unwrap_or(server_cfg.port);
    let bind = args.bind.unwrap_or(server_cfg.bind);
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("invalid bind address '{}:{}'", bind, port))?;

    if ctx.verbose {
        println!("Bind address: {}", addr);
        println!("Provider: {}", session_cfg.provider);
        println!("Cookie: {}", session_cfg.cookie_name);
        println!("Max lifetime: {}s", session_cfg.max_lifetime.as_secs());
    }

    // ── Session manager ────────────────────────────────────────────────
    let registry = ProviderRegistry::with_memory();
    let manager = Manager::from_config(&registry, &session_cfg)?;

    let server_config = ServerConfig::new()
        .with_bind_address(addr)
        .with_request_logging(server_cfg.request_logging);
    let server = Server::new(manager, server_config);

    // ── Background GC + shutdown wiring ────────────────────────────────
    let shutdown = CancellationToken::new();
    let gc = server.state().manager.spawn_gc(shutdown.clone());

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received Ctrl-C, shutting down");
        }
        signal_token.cancel();
    });

    let result = server.run(shutdown.clone()).await;

    // ── Graceful shutdown ──────────────────────────────────────────────
    shutdown.cancel();
    if let Err(e) = gc.await {
        eprintln!("warning: GC task ended abnormally: {}", e);
    }

    result?;
    Ok(())
}

/// Resolve the layered config, or a single explicit file.
fn load(args: &StartArgs, ctx: &Context) -> Result<TesseraConfig> {
    if let Some(ref path) = args.config {
        let config = tessera_config::read_config_file(path)?;
        config.validate()?;
        if ctx.verbose {
            println!("Loaded config: {}", path.display());
        }
        return Ok(config);
    }

    let loaded = tessera_config::load_config()?;
    for warning in loaded.warnings() {
        eprintln!("warning: {}", warning);
    }

    if ctx.verbose {
        let sources = loaded.loaded_from();
        if sources.is_empty() {
            println!("No config files found, using defaults + CLI args");
        } else {
            for source in sources {
                println!("Loaded config: {}", source.display());
            }
        }
    }

    Ok(loaded.config)
}
