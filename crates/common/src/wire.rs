//! JSON bodies exchanged between the services and their clients.

use serde::{Deserialize, Serialize};

use crate::entities::TripDetails;
use crate::types::{TripId, UserId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub user_id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTripResponse {
    pub trip_id: TripId,
}

/// Body of `POST /reservations`.
///
/// Fields are kept raw so that malformed input reaches validation instead of
/// being rejected by the JSON extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateReservationBody {
    #[serde(default)]
    pub user_id: i32,
    #[serde(default)]
    pub trip: Option<TripDetails>,
}

/// Confirmation for operations that return no entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error body returned by every service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}
