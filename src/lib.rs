//! Storage gateway library.
//!
//! Browser-facing gateway for a file-storage service. Every request under the
//! configured route prefix is forwarded to the storage backend and its answer
//! relayed back unchanged in status and shape.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use proxy::Forwarder;
