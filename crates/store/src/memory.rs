use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use common::{Reservation, ReservationId, Trip, TripDetails, TripId, User, UserId};
use tokio::sync::RwLock;

use crate::{
    NewReservation, ReservationRepository, Result, StoreError, TripRepository, UserRepository,
};

/// Rows keyed by identifier, with a `SERIAL`-style counter.
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i32, T>,
    next_id: i32,
}

impl<T> Table<T> {
    fn starting_at(first_id: i32) -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: first_id,
        }
    }

    fn insert_with(&mut self, build: impl FnOnce(i32) -> T) -> (i32, &T) {
        let id = self.next_id;
        self.next_id += 1;
        (id, self.rows.entry(id).or_insert(build(id)))
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

/// In-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<Table<String>>>,
}

impl InMemoryUserRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored users.
    pub async fn user_count(&self) -> usize {
        self.table.read().await.rows.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, name: &str) -> Result<UserId> {
        let mut table = self.table.write().await;
        let (id, _) = table.insert_with(|_| name.to_string());
        Ok(UserId::new(id))
    }

    async fn get(&self, id: UserId) -> Result<User> {
        let table = self.table.read().await;
        table
            .rows
            .get(&id.as_i32())
            .map(|name| User {
                user_id: id,
                name: name.clone(),
            })
            .ok_or_else(|| StoreError::not_found("user", id))
    }

    async fn delete(&self, id: UserId) -> Result<()> {
        let mut table = self.table.write().await;
        table
            .rows
            .remove(&id.as_i32())
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("user", id))
    }
}

/// In-memory trip repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTripRepository {
    table: Arc<RwLock<Table<TripDetails>>>,
}

impl InMemoryTripRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored trips.
    pub async fn trip_count(&self) -> usize {
        self.table.read().await.rows.len()
    }
}

#[async_trait]
impl TripRepository for InMemoryTripRepository {
    async fn create(&self, details: &TripDetails) -> Result<TripId> {
        let mut table = self.table.write().await;
        let (id, _) = table.insert_with(|_| details.clone());
        Ok(TripId::new(id))
    }

    async fn get(&self, id: TripId) -> Result<Trip> {
        let table = self.table.read().await;
        table
            .rows
            .get(&id.as_i32())
            .map(|details| Trip {
                trip_id: id,
                details: details.clone(),
            })
            .ok_or_else(|| StoreError::not_found("trip", id))
    }

    async fn update(&self, id: TripId, details: &TripDetails) -> Result<()> {
        let mut table = self.table.write().await;
        let row = table
            .rows
            .get_mut(&id.as_i32())
            .ok_or_else(|| StoreError::not_found("trip", id))?;
        *row = details.clone();
        Ok(())
    }
}

/// In-memory reservation repository.
///
/// Counts `create` calls and can be told to reject inserts, so callers can
/// observe whether and how the store was reached.
#[derive(Debug, Clone)]
pub struct InMemoryReservationRepository {
    table: Arc<RwLock<Table<Reservation>>>,
    fail_on_create: Arc<AtomicBool>,
    create_calls: Arc<AtomicUsize>,
    get_calls: Arc<AtomicUsize>,
}

impl Default for InMemoryReservationRepository {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl InMemoryReservationRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty repository whose first assigned identifier is `first_id`.
    pub fn starting_at(first_id: i32) -> Self {
        Self {
            table: Arc::new(RwLock::new(Table::starting_at(first_id))),
            fail_on_create: Arc::default(),
            create_calls: Arc::default(),
            get_calls: Arc::default(),
        }
    }

    /// Configures the repository to reject subsequent inserts.
    pub fn set_fail_on_create(&self, fail: bool) {
        self.fail_on_create.store(fail, Ordering::SeqCst);
    }

    /// Returns how many times `create` was called, including rejected calls.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Returns how many times `get` was called.
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    /// Returns the number of stored reservations.
    pub async fn reservation_count(&self) -> usize {
        self.table.read().await.rows.len()
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn create(&self, reservation: NewReservation) -> Result<Reservation> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_on_create.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected {
                operation: "insert reservation",
                reason: "write failed".to_string(),
            });
        }

        let mut table = self.table.write().await;
        let (_, stored) = table.insert_with(|id| Reservation {
            id: ReservationId::new(id),
            user_id: reservation.user_id,
            trip_id: reservation.trip_id,
            created_at: reservation.created_at,
        });
        Ok(stored.clone())
    }

    async fn get(&self, id: ReservationId) -> Result<Reservation> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);

        let table = self.table.read().await;
        table
            .rows
            .get(&id.as_i32())
            .cloned()
            .ok_or_else(|| StoreError::not_found("reservation", id))
    }
}
