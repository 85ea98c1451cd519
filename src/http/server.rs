//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the forwarding and liveness handlers
//! - Wire up middleware (request ID, tracing, body limit)
//! - Bind server to listener and serve until shutdown
//! - Convert forwarding failures into the proxy-failure response

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, MethodRouter},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::status::get_status;
use crate::lifecycle::shutdown::signalled;
use crate::observability::metrics;
use crate::proxy::{ContentClass, Forwarder, WildcardPath};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Forwarder,
    pub route_prefix: Arc<str>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given (validated) configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let state = AppState {
            forwarder: Forwarder::from_config(&config)?,
            route_prefix: Arc::from(config.backend.route_prefix.as_str()),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let prefix = config.backend.route_prefix.as_str();

        let mut router = Router::new().route("/healthz", get(get_status));
        router = if prefix.is_empty() {
            router
                .route("/", forward_methods())
                .route("/{*path}", forward_methods())
        } else {
            router
                .route(prefix, forward_methods())
                .route(&format!("{prefix}/"), forward_methods())
                .route(&format!("{prefix}/{{*path}}"), forward_methods())
        };

        router
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend = %self.config.backend.origin,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(signalled(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// The methods the forwarder accepts; anything else is a 405. axum also
/// routes HEAD to the GET handler.
fn forward_methods() -> MethodRouter<AppState> {
    get(forward_handler)
        .post(forward_handler)
        .put(forward_handler)
        .delete(forward_handler)
        .patch(forward_handler)
}

/// Forwarding handler. The single place a [`ForwardError`] becomes a response.
///
/// [`ForwardError`]: crate::proxy::ForwardError
async fn forward_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(request.headers()).to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let class = ContentClass::of_headers(request.headers());

    let Some(wildcard) = WildcardPath::under_prefix(&path, &state.route_prefix) else {
        tracing::warn!(request_id = %request_id, path = %path, "Path outside route prefix");
        return StatusCode::NOT_FOUND.into_response();
    };

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        class = class.as_str(),
        "Proxying request"
    );

    match state.forwarder.forward(request, wildcard).await {
        Ok(response) => {
            let status = response.status();
            tracing::debug!(
                request_id = %request_id,
                status = %status,
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Relayed backend response"
            );
            metrics::record_request(method.as_str(), status.as_u16(), class.as_str(), start_time);
            response
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                path = %path,
                transport = e.is_transport(),
                error = %e,
                "Proxy error"
            );
            metrics::record_proxy_failure(method.as_str());
            e.into_response()
        }
    }
}
