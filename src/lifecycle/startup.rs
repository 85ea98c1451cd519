//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the forwarder from the validated configuration
//! - Start the optional metrics exporter
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Fatal startup or serving failure.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid address `{0}`")]
    Address(String),

    #[error("failed to install metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("listener failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Start every subsystem and serve until `shutdown` fires.
pub async fn run(config: GatewayConfig, shutdown: Shutdown) -> Result<(), StartupError> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.backend.origin,
        route_prefix = %config.backend.route_prefix,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = parse_addr(&config.observability.metrics_address)?;
        metrics::init_metrics(addr)?;
    }

    let server = HttpServer::new(config)?;

    let addr = parse_addr(&server.config().listener.bind_address)?;
    let listener = TcpListener::bind(addr).await?;

    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}

fn parse_addr(value: &str) -> Result<SocketAddr, StartupError> {
    value
        .parse()
        .map_err(|_| StartupError::Address(value.to_string()))
}
