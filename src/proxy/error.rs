//! The single failure the forwarder originates.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Body of every proxy failure response.
pub const PROXY_FAILURE_MESSAGE: &str = "Failed to proxy request to backend";

/// Anything that stops a request from being forwarded and relayed.
///
/// Backend error statuses are not `ForwardError`s; they are relayed as-is.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("failed to read inbound body: {0}")]
    InboundBody(#[from] axum::Error),

    #[error("inbound multipart request rejected: {0}")]
    MultipartRejected(#[from] axum::extract::multipart::MultipartRejection),

    #[error("failed to decode multipart form: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("failed to build outbound request: {0}")]
    Build(String),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("upstream declared JSON but sent invalid JSON: {0}")]
    UpstreamJson(#[from] serde_json::Error),

    #[error("failed to assemble relayed response: {0}")]
    Relay(#[from] axum::http::Error),
}

impl ForwardError {
    /// True for failures reaching the backend at all (connect, DNS, timeout).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Upstream(e) if e.is_connect() || e.is_timeout() || e.is_request())
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": PROXY_FAILURE_MESSAGE })),
        )
            .into_response()
    }
}
