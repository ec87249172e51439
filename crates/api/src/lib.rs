//! HTTP services with observability for the reservation fleet.
//!
//! Three routers, one per service binary:
//! - identity: `/users`
//! - trip: `/trips`
//! - reservation: `/reservations`, backed by the reservation coordinator
//!
//! Every router also serves `/health` and `/metrics` and carries request
//! tracing and permissive CORS.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod telemetry;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use coordinator::{IdentityClient, ReservationCoordinator, TripClient};
use metrics_exporter_prometheus::PrometheusHandle;
use store::{ReservationRepository, TripRepository, UserRepository};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const IDENTITY_SERVICE: &str = "identity-service";
pub const TRIP_SERVICE: &str = "trip-service";
pub const RESERVATION_SERVICE: &str = "reservation-service";

fn finish(router: Router, service: &'static str, metrics_handle: PrometheusHandle) -> Router {
    router
        .route("/health", get(move || routes::health::check(service)))
        .merge(routes::metrics::router(metrics_handle))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the identity service router.
pub fn create_identity_app<U: UserRepository + 'static>(
    users: U,
    metrics_handle: PrometheusHandle,
) -> Router {
    let router = Router::new()
        .route("/users", post(routes::users::create::<U>))
        .route(
            "/users/{id}",
            get(routes::users::get::<U>).delete(routes::users::delete::<U>),
        )
        .with_state(Arc::new(users));

    finish(router, IDENTITY_SERVICE, metrics_handle)
}

/// Creates the trip service router.
pub fn create_trip_app<T: TripRepository + 'static>(
    trips: T,
    metrics_handle: PrometheusHandle,
) -> Router {
    let router = Router::new()
        .route("/trips", post(routes::trips::create::<T>))
        .route(
            "/trips/{id}",
            get(routes::trips::get::<T>).put(routes::trips::update::<T>),
        )
        .with_state(Arc::new(trips));

    finish(router, TRIP_SERVICE, metrics_handle)
}

/// Creates the reservation service router around a coordinator.
pub fn create_reservation_app<R, I, T>(
    coordinator: ReservationCoordinator<R, I, T>,
    metrics_handle: PrometheusHandle,
) -> Router
where
    R: ReservationRepository + 'static,
    I: IdentityClient + 'static,
    T: TripClient + 'static,
{
    let router = Router::new()
        .route("/reservations", post(routes::reservations::create::<R, I, T>))
        .route("/reservations/{id}", get(routes::reservations::get::<R, I, T>))
        .with_state(Arc::new(coordinator));

    finish(router, RESERVATION_SERVICE, metrics_handle)
}
