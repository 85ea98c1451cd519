//! Storage gateway.
//!
//! The server side of the file-storage front end. Pages call
//! `/api/<path>`; the gateway forwards each call to the storage backend.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                  GATEWAY                     │
//!     Browser request     │  ┌─────────┐    ┌───────────┐                │
//!     ────────────────────┼─▶│  http   │───▶│   proxy   │────────────────┼────▶ Storage
//!                         │  │ server  │    │ forwarder │                │      backend
//!     Relayed response    │  └─────────┘    └─────┬─────┘                │
//!     ◀───────────────────┼───────────────────────┘ relay ◀──────────────┼────
//!                         │                                              │
//!                         │  config · observability · lifecycle          │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use storage_gateway::config::load_config;
use storage_gateway::lifecycle::{signals, startup};
use storage_gateway::observability::logging::init_logging;
use storage_gateway::Shutdown;

#[derive(Parser)]
#[command(name = "storage-gateway")]
#[command(about = "Gateway forwarding file-storage API calls to the backend", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the process environment still applies.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    init_logging(&config.observability);
    tracing::info!("storage-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    startup::run(config, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
