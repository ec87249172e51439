//! Reservation service endpoints backed by the coordinator.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::wire::CreateReservationBody;
use common::{Reservation, ReservationDetails, UserId};
use coordinator::{CreateReservationRequest, IdentityClient, ReservationCoordinator, TripClient};
use store::ReservationRepository;

use crate::error::{ApiError, parse_id};

/// Coordinator shared by all reservation handlers.
pub type SharedCoordinator<R, I, T> = Arc<ReservationCoordinator<R, I, T>>;

/// POST /reservations
///
/// The pipeline runs on a detached task, so a client that disconnects midway
/// does not stop the reservation write once the trip exists.
#[tracing::instrument(skip(coordinator, payload))]
pub async fn create<R, I, T>(
    State(coordinator): State<SharedCoordinator<R, I, T>>,
    payload: Result<Json<CreateReservationBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Reservation>), ApiError>
where
    R: ReservationRepository + 'static,
    I: IdentityClient + 'static,
    T: TripClient + 'static,
{
    let Json(body) = payload?;
    let request = CreateReservationRequest {
        user_id: UserId::new(body.user_id),
        trip: body.trip,
    };

    let reservation = tokio::spawn(async move { coordinator.create_reservation(request).await })
        .await
        .map_err(|e| ApiError::Internal(format!("reservation task failed: {e}")))??;

    Ok((StatusCode::CREATED, Json(reservation)))
}

/// GET /reservations/{id}
#[tracing::instrument(skip(coordinator))]
pub async fn get<R, I, T>(
    State(coordinator): State<SharedCoordinator<R, I, T>>,
    Path(id): Path<String>,
) -> Result<Json<ReservationDetails>, ApiError>
where
    R: ReservationRepository + 'static,
    I: IdentityClient + 'static,
    T: TripClient + 'static,
{
    let reservation_id = parse_id(&id)?;

    let details = coordinator.get_reservation(reservation_id).await?;
    Ok(Json(details))
}
