//! Axum middleware for request tracking.
//!
//! [`track_request`] gives every request a correlation ID:
//!
//! 1. **Extract** it from the `X-Correlation-ID` header, or generate a UUID v4
//! 2. **Store** it in request extensions
//! 3. **Run** the request inside an `http_request` span carrying the ID
//! 4. **Count** the request in `filmorate.http.requests` by method and status
//! 5. **Echo** the ID back in the response `X-Correlation-ID` header

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

/// Header name for correlation ID.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Correlation-ID and request-count middleware, mounted with
/// [`axum::middleware::from_fn`].
pub async fn track_request(mut req: Request, next: Next) -> Response {
    let correlation_id = req
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);
    req.extensions_mut().insert(correlation_id);

    let method = req.method().to_string();
    let span = tracing::info_span!(
        "http_request",
        correlation_id = %correlation_id,
        method = %method,
        uri = %req.uri(),
    );

    let mut response = next.run(req).instrument(span).await;

    metrics::counter!(
        "filmorate.http.requests",
        "method" => method,
        "status" => response.status().as_u16().to_string()
    )
    .increment(1);

    if let Ok(value) = HeaderValue::from_str(&correlation_id.to_string()) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}
