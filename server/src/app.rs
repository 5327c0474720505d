//! Application assembly and lifecycle.
//!
//! Selects the storage backend, builds the services and router, and runs the
//! HTTP server until Ctrl+C or SIGTERM.

use crate::config::{Config, StorageBackend};
use crate::metrics;
use anyhow::Context;
use filmorate_core::environment::SystemClock;
use filmorate_core::memory::InMemoryStorage;
use filmorate_core::service::Services;
use filmorate_core::storage::Storage;
use filmorate_postgres::PostgresStorage;
use filmorate_web::{AppState, router};
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Open the configured storage backend.
///
/// For `postgres` this connects the pool and, unless disabled, applies the
/// bundled migrations.
///
/// # Errors
///
/// Returns an error if the database cannot be reached or migrated.
pub async fn build_storage(config: &Config) -> anyhow::Result<Storage> {
    match config.storage {
        StorageBackend::Memory => {
            info!("Using in-memory storage");
            Ok(InMemoryStorage::new().into_storage())
        }
        StorageBackend::Postgres => {
            info!("Connecting to PostgreSQL...");
            let storage = PostgresStorage::connect(&config.database)
                .await
                .context("connecting to PostgreSQL")?;
            if config.database.run_migrations {
                storage.migrate().await.context("running migrations")?;
            }
            Ok(storage.into_storage())
        }
    }
}

/// Build the full router: the API plus `/metrics` when enabled.
///
/// # Errors
///
/// Returns an error if the storage backend or metrics recorder cannot be set up.
pub async fn build_app(config: &Config) -> anyhow::Result<axum::Router> {
    let storage = build_storage(config).await?;
    let services = Services::new(storage, Arc::new(SystemClock));
    let mut app = router(AppState::new(services));

    if config.server.metrics_enabled {
        let handle = metrics::install()?;
        app = app.merge(metrics::metrics_router(handle));
    }

    Ok(app)
}

/// Bind the listener and serve until a shutdown signal arrives.
///
/// In-flight requests get `shutdown_timeout` to finish once the signal is
/// received.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let app = build_app(&config).await?;
    let addr = config.bind_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    info!(%addr, storage = %config.storage, "Filmorate listening");

    let timeout = config.server.shutdown_timeout;
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result.context("HTTP server failed")?,
        () = drain_deadline(timeout) => {
            warn!(?timeout, "Shutdown timed out, dropping open connections");
        }
    }

    info!("Graceful shutdown complete");
    Ok(())
}

/// Resolves `timeout` after the shutdown signal, never before it.
async fn drain_deadline(timeout: Duration) {
    shutdown_signal().await;
    tokio::time::sleep(timeout).await;
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C signal"),
        () = terminate => info!("Received SIGTERM signal"),
    }
}
