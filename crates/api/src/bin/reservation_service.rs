//! Reservation service entry point.

use api::config::{Config, RESERVATION_DEFAULT_PORT};
use api::server::{StartupError, connect_pool, serve};
use api::{RESERVATION_SERVICE, telemetry};
use coordinator::{HttpIdentityClient, HttpTripClient, ReservationCoordinator};
use store::{InMemoryReservationRepository, PostgresReservationRepository};

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = Config::from_env(RESERVATION_DEFAULT_PORT);
    telemetry::init_tracing(&config);
    let metrics_handle = telemetry::install_metrics()?;

    let identity = HttpIdentityClient::new(&config.identity_service_url, config.remote_timeout)?;
    let trips = HttpTripClient::new(&config.trip_service_url, config.remote_timeout)?;
    tracing::info!(
        identity = identity.base_url(),
        trips = trips.base_url(),
        timeout = ?config.remote_timeout,
        "remote clients configured"
    );

    let app = match &config.database_url {
        Some(url) => {
            let reservations = PostgresReservationRepository::new(connect_pool(url, &config).await?);
            reservations.run_migrations().await?;
            tracing::info!("using postgres reservation store");
            api::create_reservation_app(
                ReservationCoordinator::new(reservations, identity, trips),
                metrics_handle,
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory reservation store");
            api::create_reservation_app(
                ReservationCoordinator::new(InMemoryReservationRepository::new(), identity, trips),
                metrics_handle,
            )
        }
    };

    serve(app, &config, RESERVATION_SERVICE).await
}
