//! Liveness endpoints

use axum::Json;
use serde::Serialize;

/// Response for the health check
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always "healthy" while the process serves requests
    pub status: String,
    /// Crate version
    pub version: String,
}

/// GET / - Plain-text liveness probe
pub async fn liveness() -> &'static str {
    "OK"
}

/// GET /health - Liveness probe with version information
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
