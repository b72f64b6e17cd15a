//! ftserver - Entry Point
//!
//! Serves the working directory (or the configured root) to one client at a
//! time.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use ftserver::cli::ServerCli;
use ftserver::utils::logging::setup_logging;
use ftserver::{Server, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerCli::parse();

    // env_logger picks up RUST_LOG
    setup_logging();

    let config = ServerConfig::load(args.config.as_deref(), Some(args.port))
        .context("Failed to load configuration")?;

    info!("Launching file transfer server...");

    let server = Server::bind(config)
        .await
        .with_context(|| format!("Server startup failed on port {}", args.port))?;
    server.start().await;

    Ok(())
}
