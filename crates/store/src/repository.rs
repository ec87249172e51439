use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{Reservation, ReservationId, Trip, TripDetails, TripId, User, UserId};

use crate::Result;

/// Persistence for users, owned by the identity service.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user and returns the identifier assigned by the store.
    async fn create(&self, name: &str) -> Result<UserId>;

    /// Loads a user, failing with `NotFound` if absent.
    async fn get(&self, id: UserId) -> Result<User>;

    /// Deletes a user, failing with `NotFound` if absent.
    async fn delete(&self, id: UserId) -> Result<()>;
}

/// Persistence for trips, owned by the trip service.
#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Inserts a trip and returns the identifier assigned by the store.
    async fn create(&self, details: &TripDetails) -> Result<TripId>;

    /// Loads a trip, failing with `NotFound` if absent.
    async fn get(&self, id: TripId) -> Result<Trip>;

    /// Replaces all descriptive fields of a trip in one write.
    ///
    /// Fails with `NotFound` if the trip does not exist.
    async fn update(&self, id: TripId, details: &TripDetails) -> Result<()>;
}

/// A reservation about to be inserted. The identifier is assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub user_id: UserId,
    pub trip_id: TripId,
    pub created_at: DateTime<Utc>,
}

/// Persistence for reservations, local to the coordinator.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Inserts a reservation atomically and returns the stored row.
    async fn create(&self, reservation: NewReservation) -> Result<Reservation>;

    /// Loads a reservation, failing with `NotFound` if absent.
    async fn get(&self, id: ReservationId) -> Result<Reservation>;
}
