//! Reservation coordinator for the reservation fleet.
//!
//! A reservation ties a user owned by the identity store to a trip owned by
//! the trip store. The coordinator runs two short pipelines:
//!
//! Creating a reservation:
//! 1. Verify the user exists
//! 2. Create the trip
//! 3. Persist the reservation row
//!
//! Reading a reservation:
//! 1. Load the reservation row
//! 2. Resolve the user's name
//! 3. Resolve the trip
//!
//! Each pipeline stops at the first failure. There is no compensation, so a
//! failed step 3 of creation leaves the trip behind.

pub mod clients;
pub mod coordinator;
pub mod error;
pub mod pipeline;
pub mod request;

pub use clients::{
    HttpIdentityClient, HttpTripClient, IdentityClient, InMemoryIdentityClient,
    InMemoryTripClient, TripClient,
};
pub use coordinator::ReservationCoordinator;
pub use error::{CoordinatorError, ErrorKind, Participant, RemoteError};
pub use request::{CreateReservationRequest, validate_reservation_id};
