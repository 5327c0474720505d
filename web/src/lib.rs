//! Axum HTTP surface for Filmorate.
//!
//! Handlers are thin: they extract input, call a service from
//! `filmorate-core`, and map the result to JSON. All domain errors become
//! [`AppError`] responses with a `{code, message}` body.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         HTTP shell (Axum)               │  ← JSON, path/query parsing
//! │  - correlation IDs, tracing, metrics    │  ← error → status mapping
//! ├─────────────────────────────────────────┤
//! │         Services (filmorate-core)       │
//! │  - validation, existence checks         │
//! │  - storage through injected traits      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use filmorate_core::environment::SystemClock;
//! use filmorate_core::memory::InMemoryStorage;
//! use filmorate_core::service::Services;
//! use filmorate_web::{AppState, router};
//! use std::sync::Arc;
//!
//! let services = Services::new(InMemoryStorage::new().into_storage(), Arc::new(SystemClock));
//! let app = router(AppState::new(services));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

// Re-export key types for convenience
pub use error::AppError;
pub use middleware::{CORRELATION_ID_HEADER, track_request};
pub use routes::router;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
