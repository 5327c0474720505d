//! Prometheus metrics for observability and monitoring.
//!
//! Counters recorded across the workspace:
//! - `filmorate.films.created`, `filmorate.users.created`
//! - `filmorate.likes` and `filmorate.friendships`, labelled by `op`
//! - `filmorate.http.requests`, labelled by `method` and `status`
//!
//! [`install`] registers the descriptions and the Prometheus recorder;
//! [`metrics_router`] serves the scrape endpoint.

use axum::{Router, extract::State, routing::get};
use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use thiserror::Error;

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Install the Prometheus recorder as the global `metrics` recorder.
///
/// # Errors
///
/// Returns [`MetricsError::Install`] if another recorder is already installed.
pub fn install() -> Result<PrometheusHandle, MetricsError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::Install(e.to_string()))?;

    register_metrics();
    tracing::info!("Metrics recorder installed - available at /metrics");
    Ok(handle)
}

/// Register all metric descriptions.
fn register_metrics() {
    describe_counter!("filmorate.films.created", "Films created");
    describe_counter!("filmorate.users.created", "Users created");
    describe_counter!("filmorate.likes", "Likes added and removed, by op");
    describe_counter!(
        "filmorate.friendships",
        "Friendships added and removed, by op"
    );
    describe_counter!(
        "filmorate.http.requests",
        "HTTP requests served, by method and status"
    );
}

/// Router serving `GET /metrics` in the Prometheus text format.
pub fn metrics_router(handle: PrometheusHandle) -> Router {
    Router::new()
        .route("/metrics", get(render))
        .with_state(handle)
}

#[allow(clippy::unused_async)]
async fn render(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}
