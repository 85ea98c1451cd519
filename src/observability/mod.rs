//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Forwarder and server produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID (`x-request-id`) is attached to every forward log line
//! - Metrics are off by default

pub mod logging;
pub mod metrics;
