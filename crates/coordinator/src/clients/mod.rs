//! Remote participants consumed by the coordinator, with in-memory and HTTP
//! implementations.

pub mod http;
pub mod memory;

use async_trait::async_trait;
use common::{Trip, TripDetails, TripId, User, UserId};

use crate::error::RemoteError;

pub use http::{HttpIdentityClient, HttpTripClient};
pub use memory::{InMemoryIdentityClient, InMemoryTripClient};

/// Read access to the identity store.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Fetches a user. Also serves as the existence check during creation.
    async fn get_user(&self, user_id: UserId) -> Result<User, RemoteError>;
}

/// Access to the trip store.
#[async_trait]
pub trait TripClient: Send + Sync {
    /// Creates a trip and returns the identifier assigned by the trip store.
    async fn create_trip(&self, details: &TripDetails) -> Result<TripId, RemoteError>;

    /// Fetches a trip.
    async fn get_trip(&self, trip_id: TripId) -> Result<Trip, RemoteError>;
}
