//! Startup helpers shared by the service binaries.

use axum::Router;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use store::StoreError;
use thiserror::Error;

use crate::config::Config;
use crate::telemetry::shutdown_signal;

/// Failures that prevent a service from starting or keep it from serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to install Prometheus recorder: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    #[error("store setup failed: {0}")]
    Store(#[from] StoreError),

    #[error("failed to build remote client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Opens a connection pool sized by `DB_MAX_CONNECTIONS`.
pub async fn connect_pool(database_url: &str, config: &Config) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Binds the configured address and serves `app` until a shutdown signal.
pub async fn serve(app: Router, config: &Config, service: &'static str) -> Result<(), StartupError> {
    let addr = config.addr();
    tracing::info!(%addr, service, "starting server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: addr.clone(),
            source,
        })?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    tracing::info!(service, "server shut down gracefully");
    Ok(())
}
