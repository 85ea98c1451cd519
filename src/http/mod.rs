//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, routes)
//!     → request.rs (request ID)
//!     → proxy::Forwarder (backend exchange)
//!     → Send relayed response to client
//! ```

pub mod request;
pub mod server;
pub mod status;

pub use request::{request_id, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
