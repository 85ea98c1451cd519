//! Request forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! axum handler (http/server.rs)
//!     → forwarder.rs (one inbound request → one outbound request)
//!         → target.rs, headers.rs, content.rs, body.rs
//!     → backend (reqwest)
//!     → relay.rs (backend response → caller)
//! ```
//!
//! # Design Decisions
//! - Stateless: nothing survives a single exchange
//! - One content classification per message, dispatched on an enum
//! - Backend error statuses are data, not failures
//! - Exactly one failure response, produced from [`ForwardError`]

pub mod body;
pub mod content;
pub mod error;
pub mod forwarder;
pub mod headers;
pub mod relay;
pub mod target;

pub use content::{ContentClass, RequestEncoding};
pub use error::{ForwardError, PROXY_FAILURE_MESSAGE};
pub use forwarder::Forwarder;
pub use target::{ForwardTarget, WildcardPath};
