//! Filmorate HTTP server.
//!
//! Films, users, likes and friendships over a REST API.

use filmorate_server::{Config, app};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is fine; real environment variables still apply
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,filmorate=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Filmorate");

    let config = Config::from_env()?;
    info!(
        addr = %config.bind_addr(),
        storage = %config.storage,
        metrics = config.server.metrics_enabled,
        "Configuration loaded"
    );

    app::run(config).await
}
