//! HTTP handlers for the three services.

pub mod health;
pub mod metrics;
pub mod reservations;
pub mod trips;
pub mod users;
