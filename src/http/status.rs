//! Gateway liveness endpoint. Answered locally, never forwarded.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct GatewayStatus {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn get_status() -> Json<GatewayStatus> {
    Json(GatewayStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
