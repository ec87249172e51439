//! Types shared by every service in the reservation fleet.
//!
//! Identifiers are server-assigned positive integers. Entities are owned by
//! exactly one store; references across stores are plain identifiers with no
//! existence guarantee.

pub mod entities;
pub mod types;
pub mod wire;

pub use entities::{InvalidTrip, Reservation, ReservationDetails, Trip, TripDetails, User};
pub use types::{ReservationId, TripId, UserId};
