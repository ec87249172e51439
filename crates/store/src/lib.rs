//! Persistence for the reservation fleet.
//!
//! Each service owns one repository: users for the identity service, trips
//! for the trip service and reservations for the coordinator. Every
//! repository has an in-memory implementation and a PostgreSQL one with the
//! same semantics.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod repository;

pub use error::{Result, StoreError};
pub use memory::{InMemoryReservationRepository, InMemoryTripRepository, InMemoryUserRepository};
pub use postgres::{PostgresReservationRepository, PostgresTripRepository, PostgresUserRepository};
pub use repository::{NewReservation, ReservationRepository, TripRepository, UserRepository};
