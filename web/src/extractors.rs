//! Custom Axum extractors.
//!
//! The stock `Json`, `Path` and `Query` extractors answer malformed input with
//! plain-text rejections. The wrappers here reject with [`AppError`] instead, so
//! a bad body or a non-numeric id yields the usual `{code, message}` body with
//! status 400.
//!
//! # Examples
//!
//! ```ignore
//! async fn handler(
//!     State(state): State<AppState>,
//!     ApiPath(id): ApiPath<FilmId>,
//!     ApiJson(film): ApiJson<Film>,
//! ) -> Result<Json<Film>, AppError> {
//!     ...
//! }
//! ```

use crate::error::AppError;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON body extractor rejecting with [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path extractor rejecting with [`AppError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Query string extractor rejecting with [`AppError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::{get, post},
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Payload {
        value: i64,
    }

    #[derive(Deserialize)]
    struct Params {
        count: i64,
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/echo",
                post(|ApiJson(p): ApiJson<Payload>| async move { p.value.to_string() }),
            )
            .route(
                "/items/:id",
                get(|ApiPath(id): ApiPath<i64>| async move { id.to_string() }),
            )
            .route(
                "/count",
                get(|ApiQuery(p): ApiQuery<Params>| async move { p.count.to_string() }),
            )
    }

    async fn status_of(request: Request<Body>) -> StatusCode {
        app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let request = Request::post("/echo")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_content_type_is_bad_request() {
        let request = Request::post("/echo")
            .body(Body::from(r#"{"value": 1}"#))
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_numeric_path_is_bad_request() {
        let request = Request::get("/items/abc").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn bad_query_is_bad_request() {
        let request = Request::get("/count?count=many").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn well_formed_input_passes() {
        let request = Request::get("/items/42").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::OK);
    }
}
