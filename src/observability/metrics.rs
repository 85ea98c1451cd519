//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): forwarded requests by method, status, body class
//! - `gateway_request_duration_seconds` (histogram): round-trip latency by method
//! - `gateway_proxy_failures_total` (counter): requests answered with the proxy failure
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with its own HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a relayed request.
pub fn record_request(method: &str, status: u16, class: &'static str, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "class" => class
    )
    .increment(1);

    metrics::histogram!(
        "gateway_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a request answered with the proxy failure.
pub fn record_proxy_failure(method: &str) {
    metrics::counter!("gateway_proxy_failures_total", "method" => method.to_string()).increment(1);
}
