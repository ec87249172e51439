//! Trip service entry point.

use api::config::{Config, TRIP_DEFAULT_PORT};
use api::server::{StartupError, connect_pool, serve};
use api::{TRIP_SERVICE, telemetry};
use store::{InMemoryTripRepository, PostgresTripRepository};

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = Config::from_env(TRIP_DEFAULT_PORT);
    telemetry::init_tracing(&config);
    let metrics_handle = telemetry::install_metrics()?;

    let app = match &config.database_url {
        Some(url) => {
            let trips = PostgresTripRepository::new(connect_pool(url, &config).await?);
            trips.run_migrations().await?;
            tracing::info!("using postgres trip store");
            api::create_trip_app(trips, metrics_handle)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory trip store");
            api::create_trip_app(InMemoryTripRepository::new(), metrics_handle)
        }
    };

    serve(app, &config, TRIP_SERVICE).await
}
