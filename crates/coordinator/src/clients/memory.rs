//! In-memory identity and trip stores for testing.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use common::{Trip, TripDetails, TripId, User, UserId};

use super::{IdentityClient, TripClient};
use crate::error::RemoteError;

#[derive(Debug)]
struct InMemoryIdentityState {
    users: BTreeMap<UserId, String>,
    next_id: i32,
    unavailable: bool,
    get_user_calls: usize,
}

impl Default for InMemoryIdentityState {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            next_id: 1,
            unavailable: false,
            get_user_calls: 0,
        }
    }
}

/// In-memory identity store for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityClient {
    state: Arc<Mutex<InMemoryIdentityState>>,
}

impl InMemoryIdentityClient {
    /// Creates an identity store with no users.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, InMemoryIdentityState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a user and returns its identifier.
    pub fn add_user(&self, name: impl Into<String>) -> UserId {
        let mut state = self.state();
        let id = UserId::new(state.next_id);
        state.next_id += 1;
        state.users.insert(id, name.into());
        id
    }

    /// Deletes a user. Returns false if it did not exist.
    pub fn remove_user(&self, user_id: UserId) -> bool {
        self.state().users.remove(&user_id).is_some()
    }

    /// Makes every call fail as if the store could not be reached.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state().unavailable = unavailable;
    }

    /// Returns how many times `get_user` was called.
    pub fn get_user_calls(&self) -> usize {
        self.state().get_user_calls
    }
}

#[async_trait]
impl IdentityClient for InMemoryIdentityClient {
    async fn get_user(&self, user_id: UserId) -> Result<User, RemoteError> {
        let mut state = self.state();
        state.get_user_calls += 1;

        if state.unavailable {
            return Err(RemoteError::Unavailable(
                "connection refused".to_string(),
            ));
        }

        state
            .users
            .get(&user_id)
            .map(|name| User {
                user_id,
                name: name.clone(),
            })
            .ok_or_else(|| RemoteError::NotFound(format!("user {user_id} not found")))
    }
}

#[derive(Debug)]
struct InMemoryTripState {
    trips: BTreeMap<TripId, TripDetails>,
    next_id: i32,
    fail_on_create: bool,
    fail_after_create: bool,
    fail_on_get: bool,
    create_calls: usize,
    get_calls: usize,
}

impl InMemoryTripState {
    fn starting_at(first_id: i32) -> Self {
        Self {
            trips: BTreeMap::new(),
            next_id: first_id,
            fail_on_create: false,
            fail_after_create: false,
            fail_on_get: false,
            create_calls: 0,
            get_calls: 0,
        }
    }
}

/// In-memory trip store for testing.
#[derive(Debug, Clone)]
pub struct InMemoryTripClient {
    state: Arc<Mutex<InMemoryTripState>>,
}

impl Default for InMemoryTripClient {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl InMemoryTripClient {
    /// Creates a trip store with no trips.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a trip store whose first assigned identifier is `first_id`.
    pub fn starting_at(first_id: i32) -> Self {
        Self {
            state: Arc::new(Mutex::new(InMemoryTripState::starting_at(first_id))),
        }
    }

    fn state(&self) -> MutexGuard<'_, InMemoryTripState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Configures `create_trip` to fail without storing anything.
    pub fn set_fail_on_create(&self, fail: bool) {
        self.state().fail_on_create = fail;
    }

    /// Configures `create_trip` to store the trip and then report failure,
    /// as a store that loses its reply would.
    pub fn set_fail_after_create(&self, fail: bool) {
        self.state().fail_after_create = fail;
    }

    /// Configures `get_trip` to fail as if the store could not be reached.
    pub fn set_fail_on_get(&self, fail: bool) {
        self.state().fail_on_get = fail;
    }

    /// Deletes a trip. Returns false if it did not exist.
    pub fn remove_trip(&self, trip_id: TripId) -> bool {
        self.state().trips.remove(&trip_id).is_some()
    }

    /// Returns the number of stored trips.
    pub fn trip_count(&self) -> usize {
        self.state().trips.len()
    }

    /// Returns true if a trip exists with the given ID.
    pub fn has_trip(&self, trip_id: TripId) -> bool {
        self.state().trips.contains_key(&trip_id)
    }

    /// Returns how many times `create_trip` was called.
    pub fn create_calls(&self) -> usize {
        self.state().create_calls
    }

    /// Returns how many times `get_trip` was called.
    pub fn get_calls(&self) -> usize {
        self.state().get_calls
    }
}

#[async_trait]
impl TripClient for InMemoryTripClient {
    async fn create_trip(&self, details: &TripDetails) -> Result<TripId, RemoteError> {
        let mut state = self.state();
        state.create_calls += 1;

        if state.fail_on_create {
            return Err(RemoteError::Unavailable(
                "trip store unreachable".to_string(),
            ));
        }

        let trip_id = TripId::new(state.next_id);
        state.next_id += 1;
        state.trips.insert(trip_id, details.clone());

        if state.fail_after_create {
            return Err(RemoteError::Unavailable(
                "connection reset before reply".to_string(),
            ));
        }

        Ok(trip_id)
    }

    async fn get_trip(&self, trip_id: TripId) -> Result<Trip, RemoteError> {
        let mut state = self.state();
        state.get_calls += 1;

        if state.fail_on_get {
            return Err(RemoteError::Unavailable(
                "trip store unreachable".to_string(),
            ));
        }

        state
            .trips
            .get(&trip_id)
            .map(|details| Trip {
                trip_id,
                details: details.clone(),
            })
            .ok_or_else(|| RemoteError::NotFound(format!("trip {trip_id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_get_and_remove_user() {
        let identity = InMemoryIdentityClient::new();
        let id = identity.add_user("Alice");

        let user = identity.get_user(id).await.unwrap();
        assert_eq!(user.name, "Alice");

        assert!(identity.remove_user(id));
        assert!(matches!(
            identity.get_user(id).await,
            Err(RemoteError::NotFound(_))
        ));
        assert_eq!(identity.get_user_calls(), 2);
    }

    #[tokio::test]
    async fn test_unavailable_identity() {
        let identity = InMemoryIdentityClient::new();
        let id = identity.add_user("Alice");
        identity.set_unavailable(true);

        let result = identity.get_user(id).await;
        assert!(matches!(result, Err(RemoteError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_sequential_trip_ids() {
        let trips = InMemoryTripClient::starting_at(5);
        let details = TripDetails::new("NYC", "BOS", 200, 150);

        let t1 = trips.create_trip(&details).await.unwrap();
        let t2 = trips.create_trip(&details).await.unwrap();

        assert_eq!(t1, TripId::new(5));
        assert_eq!(t2, TripId::new(6));
        assert_eq!(trips.get_trip(t1).await.unwrap().details, details);
    }

    #[tokio::test]
    async fn test_fail_on_create_stores_nothing() {
        let trips = InMemoryTripClient::new();
        trips.set_fail_on_create(true);

        let result = trips
            .create_trip(&TripDetails::new("NYC", "BOS", 200, 150))
            .await;
        assert!(result.is_err());
        assert_eq!(trips.trip_count(), 0);
        assert_eq!(trips.create_calls(), 1);
    }

    #[tokio::test]
    async fn test_fail_after_create_keeps_trip() {
        let trips = InMemoryTripClient::new();
        trips.set_fail_after_create(true);

        let result = trips
            .create_trip(&TripDetails::new("NYC", "BOS", 200, 150))
            .await;
        assert!(result.is_err());
        assert_eq!(trips.trip_count(), 1);
        assert!(trips.has_trip(TripId::new(1)));
    }
}
