//! Entities owned by the identity, trip and reservation stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ReservationId, TripId, UserId};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
}

/// Reasons a trip descriptor is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidTrip {
    #[error("origin must not be empty")]
    EmptyOrigin,

    #[error("destination must not be empty")]
    EmptyDestination,

    #[error("distance must be positive, got {0}")]
    NonPositiveDistance(i32),

    #[error("cost must be positive, got {0}")]
    NonPositiveCost(i32),
}

/// The descriptive fields of a trip. Updates always replace all four.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripDetails {
    pub origin: String,
    pub destination: String,
    pub distance: i32,
    pub cost: i32,
}

impl TripDetails {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        distance: i32,
        cost: i32,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            distance,
            cost,
        }
    }

    /// Checks the descriptor, reporting the first violated field.
    ///
    /// Labels consisting only of whitespace count as empty.
    pub fn validate(&self) -> Result<(), InvalidTrip> {
        if self.origin.trim().is_empty() {
            return Err(InvalidTrip::EmptyOrigin);
        }
        if self.destination.trim().is_empty() {
            return Err(InvalidTrip::EmptyDestination);
        }
        if self.distance <= 0 {
            return Err(InvalidTrip::NonPositiveDistance(self.distance));
        }
        if self.cost <= 0 {
            return Err(InvalidTrip::NonPositiveCost(self.cost));
        }
        Ok(())
    }
}

/// A trip as stored by the trip store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub trip_id: TripId,
    #[serde(flatten)]
    pub details: TripDetails,
}

/// A persisted reservation.
///
/// `user_id` and `trip_id` are weak references into other stores; nothing
/// guarantees the referenced records still exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub user_id: UserId,
    pub trip_id: TripId,
    pub created_at: DateTime<Utc>,
}

/// Aggregate read view joining a reservation with its user and trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDetails {
    pub reservation_id: ReservationId,
    pub user_id: UserId,
    pub trip_id: TripId,
    pub user_name: String,
    pub origin: String,
    pub destination: String,
    pub distance: i32,
    pub cost: i32,
    pub created_at: DateTime<Utc>,
}
