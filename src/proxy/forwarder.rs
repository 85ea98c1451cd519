//! The request forwarder.
//!
//! # Pipeline
//! ```text
//! inbound request
//!     → target.rs  (origin + wildcard path + raw query)
//!     → headers.rs (denylist)
//!     → body.rs    (one encoding decision, read + re-encode)
//!     → dispatch   (fresh outbound request)
//!     → relay.rs   (status, reason, headers, decoded body)
//! ```
//!
//! Any failure on the way is returned as a [`ForwardError`]; the caller turns
//! it into the single proxy-failure response.

use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request, Response},
};

use crate::config::GatewayConfig;
use crate::proxy::body::{carries_body, OutboundBody};
use crate::proxy::content::RequestEncoding;
use crate::proxy::error::ForwardError;
use crate::proxy::headers::filter_request_headers;
use crate::proxy::relay::relay;
use crate::proxy::target::{ForwardTarget, WildcardPath};

/// Stateless forwarder bound to one backend origin.
///
/// Cloning is cheap; clones share the outbound client.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    origin: String,
    max_body_bytes: usize,
}

impl Forwarder {
    /// Build a forwarder from a validated config.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .pool_max_idle_per_host(0)
            .no_proxy()
            .build()?;

        Ok(Self::with_client(
            client,
            config.backend.origin.clone(),
            config.limits.max_body_bytes,
        ))
    }

    /// Build a forwarder around an existing client. `origin` must not end
    /// with `/`.
    pub fn with_client(client: reqwest::Client, origin: String, max_body_bytes: usize) -> Self {
        Self {
            client,
            origin,
            max_body_bytes,
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Forward `request` to the backend under `path` and relay the answer.
    ///
    /// Backend error statuses come back as `Ok`; only failures to complete
    /// the exchange are `Err`.
    pub async fn forward(
        &self,
        request: Request<Body>,
        path: WildcardPath,
    ) -> Result<Response<Body>, ForwardError> {
        // HEAD arrives through the GET route; the server drops the relayed body.
        let method = if request.method() == Method::HEAD {
            Method::GET
        } else {
            request.method().clone()
        };
        let query = request.uri().query().map(str::to_string);
        let url = ForwardTarget::new(&self.origin, path, query.as_deref()).to_string();

        let encoding = RequestEncoding::of_headers(request.headers());
        let with_body = carries_body(&method);
        let headers = filter_request_headers(request.headers(), encoding, with_body);

        let body = if with_body {
            OutboundBody::read(request, encoding, self.max_body_bytes).await?
        } else {
            OutboundBody::Empty
        };

        tracing::debug!(
            method = %method,
            url = %url,
            body = %body.describe(),
            "Dispatching to backend"
        );

        let outbound = self.client.request(method, url).headers(headers);
        let upstream = body.attach(outbound).send().await?;

        relay(upstream).await
    }
}
