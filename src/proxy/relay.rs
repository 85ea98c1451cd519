//! Response translation: backend response → relayed response.
//!
//! Status, reason phrase and headers are always reused. The body is decoded
//! according to the backend's `Content-Type` and serialised again.

use axum::{
    body::{Body, Bytes},
    http::StatusCode,
    response::Response,
};
use hyper::ext::ReasonPhrase;
use serde_json::Value;

use crate::proxy::content::ContentClass;
use crate::proxy::error::ForwardError;
use crate::proxy::headers::filter_response_headers;

/// A decoded backend body.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayBody {
    Json(Value),
    Text(String),
    Binary(Bytes),
}

impl RelayBody {
    /// Decode `bytes` as the backend declared them.
    ///
    /// Declared JSON that does not parse is a proxy failure. Text is decoded
    /// as UTF-8 with invalid sequences replaced.
    pub fn decode(class: ContentClass, bytes: Bytes) -> Result<Self, ForwardError> {
        match class {
            ContentClass::Json => Ok(Self::Json(serde_json::from_slice(&bytes)?)),
            ContentClass::Text => Ok(Self::Text(String::from_utf8_lossy(&bytes).into_owned())),
            ContentClass::Multipart | ContentClass::Binary => Ok(Self::Binary(bytes)),
        }
    }

    pub fn into_body(self) -> Result<Body, ForwardError> {
        Ok(match self {
            Self::Json(value) => Body::from(serde_json::to_vec(&value)?),
            Self::Text(text) => Body::from(text),
            Self::Binary(bytes) => Body::from(bytes),
        })
    }
}

/// Relay a backend response to the caller.
pub async fn relay(upstream: reqwest::Response) -> Result<Response, ForwardError> {
    let status = upstream.status();
    let reason = upstream.extensions().get::<ReasonPhrase>().cloned();
    let headers = filter_response_headers(upstream.headers());
    let class = ContentClass::of_headers(upstream.headers());

    let bytes = upstream.bytes().await?;
    let body = RelayBody::decode(class, bytes)?;

    tracing::trace!(status = %status, class = class.as_str(), "Relaying upstream body");

    build_response(status, reason, headers, body)
}

fn build_response(
    status: StatusCode,
    reason: Option<ReasonPhrase>,
    headers: axum::http::HeaderMap,
    body: RelayBody,
) -> Result<Response, ForwardError> {
    let mut response = Response::builder().status(status).body(body.into_body()?)?;
    *response.headers_mut() = headers;
    if let Some(reason) = reason {
        response.extensions_mut().insert(reason);
    }
    Ok(response)
}
