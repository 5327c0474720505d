//! # Filmorate Server
//!
//! Wires configuration, storage selection, metrics and the HTTP router into a
//! runnable process. The binary in `main.rs` only loads `.env`, installs
//! tracing and calls [`app::run`].

pub mod app;
pub mod config;
pub mod metrics;

pub use config::{Config, ConfigError, StorageBackend};
pub use metrics::MetricsError;
