//! Identity service entry point.

use api::config::{Config, IDENTITY_DEFAULT_PORT};
use api::server::{StartupError, connect_pool, serve};
use api::{IDENTITY_SERVICE, telemetry};
use store::{InMemoryUserRepository, PostgresUserRepository};

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = Config::from_env(IDENTITY_DEFAULT_PORT);
    telemetry::init_tracing(&config);
    let metrics_handle = telemetry::install_metrics()?;

    let app = match &config.database_url {
        Some(url) => {
            let users = PostgresUserRepository::new(connect_pool(url, &config).await?);
            users.run_migrations().await?;
            tracing::info!("using postgres user store");
            api::create_identity_app(users, metrics_handle)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory user store");
            api::create_identity_app(InMemoryUserRepository::new(), metrics_handle)
        }
    };

    serve(app, &config, IDENTITY_SERVICE).await
}
