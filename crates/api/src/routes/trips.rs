//! Trip service endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::wire::{CreateTripResponse, MessageResponse};
use common::{Trip, TripDetails};
use store::TripRepository;

use crate::error::{ApiError, parse_id};

fn validated(payload: Result<Json<TripDetails>, JsonRejection>) -> Result<TripDetails, ApiError> {
    let Json(details) = payload?;
    details
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(details)
}

/// POST /trips: stores a trip and returns its server-assigned identifier.
#[tracing::instrument(skip(repo, payload))]
pub async fn create<T: TripRepository + 'static>(
    State(repo): State<Arc<T>>,
    payload: Result<Json<TripDetails>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateTripResponse>), ApiError> {
    metrics::counter!("trip_requests_total", "method" => "create_trip").increment(1);
    let details = validated(payload)?;

    let trip_id = repo.create(&details).await?;
    tracing::info!(%trip_id, "trip created");

    Ok((StatusCode::CREATED, Json(CreateTripResponse { trip_id })))
}

/// GET /trips/{id}
#[tracing::instrument(skip(repo))]
pub async fn get<T: TripRepository + 'static>(
    State(repo): State<Arc<T>>,
    Path(id): Path<String>,
) -> Result<Json<Trip>, ApiError> {
    metrics::counter!("trip_requests_total", "method" => "get_trip").increment(1);
    let trip_id = parse_id(&id)?;

    let trip = repo.get(trip_id).await?;
    Ok(Json(trip))
}

/// PUT /trips/{id}: replaces all four fields of an existing trip.
#[tracing::instrument(skip(repo, payload))]
pub async fn update<T: TripRepository + 'static>(
    State(repo): State<Arc<T>>,
    Path(id): Path<String>,
    payload: Result<Json<TripDetails>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    metrics::counter!("trip_requests_total", "method" => "update_trip").increment(1);
    let trip_id = parse_id(&id)?;
    let details = validated(payload)?;

    repo.update(trip_id, &details).await?;
    tracing::info!(%trip_id, "trip updated");

    Ok(Json(MessageResponse {
        message: format!("Trip {trip_id} updated successfully"),
    }))
}
