//! Client requests and their local validation.

use common::{ReservationId, TripDetails, UserId};

use crate::error::{CoordinatorError, Result};
use crate::pipeline::ValidatedCreate;

/// Input to `CreateReservation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReservationRequest {
    pub user_id: UserId,
    pub trip: Option<TripDetails>,
}

impl CreateReservationRequest {
    pub fn new(user_id: impl Into<UserId>, trip: TripDetails) -> Self {
        Self {
            user_id: user_id.into(),
            trip: Some(trip),
        }
    }

    /// Checks every precondition without contacting any store.
    pub fn validate(self) -> Result<ValidatedCreate> {
        if !self.user_id.is_positive() {
            return Err(CoordinatorError::InvalidArgument(format!(
                "user_id must be positive, got {}",
                self.user_id
            )));
        }

        let trip = self
            .trip
            .ok_or_else(|| CoordinatorError::InvalidArgument("trip is required".to_string()))?;
        trip.validate()?;

        Ok(ValidatedCreate {
            user_id: self.user_id,
            trip,
        })
    }
}

/// Checks a reservation identifier received from a client.
pub fn validate_reservation_id(id: ReservationId) -> Result<ReservationId> {
    if !id.is_positive() {
        return Err(CoordinatorError::InvalidArgument(format!(
            "reservation_id must be positive, got {id}"
        )));
    }
    Ok(id)
}
