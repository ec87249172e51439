//! Typed stages of the reservation pipelines.
//!
//! Each coordinator step consumes one stage and produces the next, so a
//! stage value is proof that every earlier step succeeded.
//!
//! Create: [`ValidatedCreate`] → [`UserVerified`] → [`TripCreated`] → `Reservation`.
//! Read: [`ReservationLoaded`] → [`UserResolved`] → `ReservationDetails`.

use common::{Reservation, TripDetails, TripId, User, UserId};

pub const STEP_VERIFY_USER: &str = "verify_user";
pub const STEP_CREATE_TRIP: &str = "create_trip";
pub const STEP_PERSIST_RESERVATION: &str = "persist_reservation";
pub const STEP_LOAD_RESERVATION: &str = "load_reservation";
pub const STEP_RESOLVE_USER: &str = "resolve_user";
pub const STEP_RESOLVE_TRIP: &str = "resolve_trip";

/// A creation request that passed local validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCreate {
    pub user_id: UserId,
    pub trip: TripDetails,
}

/// The identity store confirmed the user exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserVerified {
    pub user: User,
    pub trip: TripDetails,
}

/// The trip store created the trip. From here on a failure orphans the trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripCreated {
    pub user_id: UserId,
    pub trip_id: TripId,
}

/// The reservation row was found locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationLoaded {
    pub reservation: Reservation,
}

/// The identity store resolved the reservation's user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserResolved {
    pub reservation: Reservation,
    pub user_name: String,
}
