//! Health check endpoint.
//!
//! Used by load balancers and monitoring systems to verify the service is up.

use crate::state::AppState;
use axum::{Json, extract::State};
use serde::Serialize;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
    /// Storage backend in use
    pub storage: &'static str,
}

/// Liveness check. Does NOT probe the database.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// { "status": "ok", "version": "0.1.0", "storage": "memory" }
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        storage: state.services.backend(),
    })
}
