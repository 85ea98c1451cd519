//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::net::SocketAddr;

use axum::{
    body::Bytes,
    extract::Multipart,
    http::{header, HeaderMap, Method, Uri},
    routing::any,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use storage_gateway::config::loader::finalize;
use storage_gateway::{GatewayConfig, HttpServer, Shutdown};

/// Serve `router` on an ephemeral localhost port.
pub async fn spawn_backend(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// An address nothing listens on.
pub fn closed_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// A running gateway; shut down on drop.
pub struct Gateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl Gateway {
    /// URL of `path` under the gateway's `/api` prefix.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}/api{}", self.addr, path)
    }

    /// URL outside the route prefix.
    pub fn root_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for Gateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a gateway forwarding to `backend`.
pub async fn spawn_gateway(backend: SocketAddr) -> Gateway {
    spawn_gateway_with(backend, |_| {}).await
}

/// Start a gateway forwarding to `backend`, after `tweak` adjusts the config.
pub async fn spawn_gateway_with<F>(backend: SocketAddr, tweak: F) -> Gateway
where
    F: FnOnce(&mut GatewayConfig),
{
    let mut config = GatewayConfig::default();
    config.backend.origin = format!("http://{}/", backend);
    config.listener.bind_address = "127.0.0.1:0".to_string();
    tweak(&mut config);
    let config = finalize(config).unwrap();

    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    Gateway { addr, shutdown }
}

/// Client that never goes through an environment proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Describe the request the backend received.
pub async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Value> {
    let value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query(),
        "host": value(header::HOST),
        "content_type": value(header::CONTENT_TYPE),
        "content_length": value(header::CONTENT_LENGTH),
        "authorization": value(header::AUTHORIZATION),
        "request_id": value(header::HeaderName::from_static("x-request-id")),
        "body": String::from_utf8_lossy(&body),
        "body_len": body.len(),
    }))
}

/// Describe a multipart form the backend received, part by part.
pub async fn echo_multipart(headers: HeaderMap, mut multipart: Multipart) -> Json<Value> {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.unwrap();
        parts.push(json!({
            "name": name,
            "file_name": file_name,
            "content_type": content_type,
            "bytes": bytes.to_vec(),
        }));
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    Json(json!({ "content_type": content_type, "parts": parts }))
}

/// A backend answering every path with [`echo`].
pub fn echo_router() -> Router {
    Router::new()
        .route("/", any(echo))
        .route("/{*path}", any(echo))
}
