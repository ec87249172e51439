//! Reservation coordinator orchestrating the identity, trip and reservation
//! stores.

use std::time::Instant;

use chrono::{SubsecRound, Utc};
use common::{Reservation, ReservationDetails, ReservationId};
use store::{NewReservation, ReservationRepository};

use crate::clients::{IdentityClient, TripClient};
use crate::error::{CoordinatorError, ErrorKind, Participant, Result};
use crate::pipeline::{
    ReservationLoaded, STEP_CREATE_TRIP, STEP_LOAD_RESERVATION, STEP_PERSIST_RESERVATION,
    STEP_RESOLVE_TRIP, STEP_RESOLVE_USER, STEP_VERIFY_USER, TripCreated, UserResolved,
    UserVerified, ValidatedCreate,
};
use crate::request::{CreateReservationRequest, validate_reservation_id};

const METHOD_CREATE: &str = "create_reservation";
const METHOD_GET: &str = "get_reservation";

/// Ties a user, a remotely owned trip and a local reservation row together.
///
/// Steps run strictly in order and stop at the first failure. Nothing is
/// retried or compensated: a trip created before a failed reservation write
/// stays in the trip store without a reservation pointing at it.
pub struct ReservationCoordinator<R, I, T>
where
    R: ReservationRepository,
    I: IdentityClient,
    T: TripClient,
{
    reservations: R,
    identity: I,
    trips: T,
}

impl<R, I, T> ReservationCoordinator<R, I, T>
where
    R: ReservationRepository,
    I: IdentityClient,
    T: TripClient,
{
    /// Creates a new reservation coordinator.
    pub fn new(reservations: R, identity: I, trips: T) -> Self {
        Self {
            reservations,
            identity,
            trips,
        }
    }

    /// Validates the request, verifies the user, creates the trip and
    /// persists the reservation.
    #[tracing::instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn create_reservation(
        &self,
        request: CreateReservationRequest,
    ) -> Result<Reservation> {
        metrics::counter!("reservation_requests_total", "method" => METHOD_CREATE).increment(1);
        let started = Instant::now();

        let result = self.run_create(request).await;

        record_outcome(METHOD_CREATE, started, &result);
        if let Ok(reservation) = &result {
            tracing::info!(
                reservation_id = %reservation.id,
                trip_id = %reservation.trip_id,
                "reservation created"
            );
        }
        result
    }

    async fn run_create(&self, request: CreateReservationRequest) -> Result<Reservation> {
        let validated = request.validate()?;
        let verified = self.verify_user(validated).await?;
        let created = self.create_trip(verified).await?;
        self.persist_reservation(created).await
    }

    /// Loads a reservation and resolves its user and trip.
    #[tracing::instrument(skip(self))]
    pub async fn get_reservation(&self, reservation_id: ReservationId) -> Result<ReservationDetails> {
        metrics::counter!("reservation_requests_total", "method" => METHOD_GET).increment(1);
        let started = Instant::now();

        let result = self.run_get(reservation_id).await;

        record_outcome(METHOD_GET, started, &result);
        result
    }

    async fn run_get(&self, reservation_id: ReservationId) -> Result<ReservationDetails> {
        let loaded = self.load_reservation(reservation_id).await?;
        let resolved = self.resolve_user(loaded).await?;
        self.resolve_trip(resolved).await
    }

    /// Step 1 of creation: the user must exist in the identity store.
    pub async fn verify_user(&self, stage: ValidatedCreate) -> Result<UserVerified> {
        tracing::info!(step = STEP_VERIFY_USER, "reservation step started");

        let user = self
            .identity
            .get_user(stage.user_id)
            .await
            .map_err(|e| CoordinatorError::from_remote(Participant::IdentityStore, e))?;

        Ok(UserVerified {
            user,
            trip: stage.trip,
        })
    }

    /// Step 2 of creation: the trip store creates the trip.
    pub async fn create_trip(&self, stage: UserVerified) -> Result<TripCreated> {
        tracing::info!(step = STEP_CREATE_TRIP, "reservation step started");

        let trip_id = self
            .trips
            .create_trip(&stage.trip)
            .await
            .map_err(|e| CoordinatorError::unavailable(Participant::TripStore, e))?;

        Ok(TripCreated {
            user_id: stage.user.user_id,
            trip_id,
        })
    }

    /// Step 3 of creation: the reservation row is written locally.
    ///
    /// On failure the trip from step 2 is left in place.
    pub async fn persist_reservation(&self, stage: TripCreated) -> Result<Reservation> {
        tracing::info!(step = STEP_PERSIST_RESERVATION, "reservation step started");

        let new_reservation = NewReservation {
            user_id: stage.user_id,
            trip_id: stage.trip_id,
            created_at: Utc::now().trunc_subsecs(0),
        };

        self.reservations
            .create(new_reservation)
            .await
            .map_err(|e| {
                metrics::counter!("orphaned_trips_total").increment(1);
                tracing::warn!(
                    trip_id = %stage.trip_id,
                    error = %e,
                    "reservation write failed, trip has no reservation"
                );
                CoordinatorError::Database(e)
            })
    }

    /// Step 1 of lookup: the reservation row must exist locally.
    pub async fn load_reservation(&self, reservation_id: ReservationId) -> Result<ReservationLoaded> {
        let reservation_id = validate_reservation_id(reservation_id)?;
        tracing::info!(step = STEP_LOAD_RESERVATION, "reservation step started");

        let reservation = self
            .reservations
            .get(reservation_id)
            .await
            .map_err(CoordinatorError::from_store)?;

        Ok(ReservationLoaded { reservation })
    }

    /// Step 2 of lookup: resolve the user's display name.
    ///
    /// A user deleted since creation fails the whole read.
    pub async fn resolve_user(&self, stage: ReservationLoaded) -> Result<UserResolved> {
        tracing::info!(step = STEP_RESOLVE_USER, "reservation step started");

        let user = self
            .identity
            .get_user(stage.reservation.user_id)
            .await
            .map_err(|e| CoordinatorError::unavailable(Participant::IdentityStore, e))?;

        Ok(UserResolved {
            reservation: stage.reservation,
            user_name: user.name,
        })
    }

    /// Step 3 of lookup: resolve the trip and assemble the read view.
    pub async fn resolve_trip(&self, stage: UserResolved) -> Result<ReservationDetails> {
        tracing::info!(step = STEP_RESOLVE_TRIP, "reservation step started");

        let trip = self
            .trips
            .get_trip(stage.reservation.trip_id)
            .await
            .map_err(|e| CoordinatorError::unavailable(Participant::TripStore, e))?;

        let reservation = stage.reservation;
        Ok(ReservationDetails {
            reservation_id: reservation.id,
            user_id: reservation.user_id,
            trip_id: reservation.trip_id,
            user_name: stage.user_name,
            origin: trip.details.origin,
            destination: trip.details.destination,
            distance: trip.details.distance,
            cost: trip.details.cost,
            created_at: reservation.created_at,
        })
    }
}

fn record_outcome<V>(method: &'static str, started: Instant, result: &Result<V>) {
    metrics::histogram!("reservation_duration_seconds", "method" => method)
        .record(started.elapsed().as_secs_f64());

    let Err(err) = result else {
        return;
    };

    let kind = err.kind();
    metrics::counter!(
        "reservation_errors_total",
        "method" => method,
        "type" => kind.as_str()
    )
    .increment(1);

    let participant = err.participant().map(|p| p.to_string()).unwrap_or_default();
    match kind {
        ErrorKind::InvalidArgument | ErrorKind::NotFound => {
            tracing::warn!(method, %participant, error = %err, "reservation request rejected");
        }
        ErrorKind::Unavailable | ErrorKind::Internal => {
            tracing::error!(method, %participant, error = %err, "reservation request failed");
        }
    }
}
