use async_trait::async_trait;
use common::{Reservation, ReservationId, Trip, TripDetails, TripId, User, UserId};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{
    NewReservation, ReservationRepository, Result, StoreError, TripRepository, UserRepository,
};

/// Maps `RowNotFound` to the repository's `NotFound` for the given record.
fn absent_as_not_found(entity: &'static str, id: i32) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |e| match e {
        sqlx::Error::RowNotFound => StoreError::NotFound { entity, id },
        other => StoreError::Database(other),
    }
}

/// PostgreSQL-backed user repository.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the `users` table if needed.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations/identity")
            .run(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[tracing::instrument(skip(self))]
    async fn create(&self, name: &str) -> Result<UserId> {
        let id: i32 = sqlx::query_scalar("INSERT INTO users (name) VALUES ($1) RETURNING user_id")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(UserId::new(id))
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: UserId) -> Result<User> {
        let name: String = sqlx::query_scalar("SELECT name FROM users WHERE user_id = $1")
            .bind(id.as_i32())
            .fetch_one(&self.pool)
            .await
            .map_err(absent_as_not_found("user", id.as_i32()))?;
        Ok(User { user_id: id, name })
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: UserId) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("user", id));
        }
        Ok(())
    }
}

/// PostgreSQL-backed trip repository.
#[derive(Clone)]
pub struct PostgresTripRepository {
    pool: PgPool,
}

impl PostgresTripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the `trips` table if needed.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations/trips")
            .run(&self.pool)
            .await?;
        Ok(())
    }

    fn row_to_trip(row: PgRow) -> Result<Trip> {
        Ok(Trip {
            trip_id: TripId::new(row.try_get("trip_id")?),
            details: TripDetails {
                origin: row.try_get("origin")?,
                destination: row.try_get("destination")?,
                distance: row.try_get("distance")?,
                cost: row.try_get("cost")?,
            },
        })
    }
}

#[async_trait]
impl TripRepository for PostgresTripRepository {
    #[tracing::instrument(skip(self))]
    async fn create(&self, details: &TripDetails) -> Result<TripId> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO trips (origin, destination, distance, cost)
            VALUES ($1, $2, $3, $4)
            RETURNING trip_id
            "#,
        )
        .bind(&details.origin)
        .bind(&details.destination)
        .bind(details.distance)
        .bind(details.cost)
        .fetch_one(&self.pool)
        .await?;
        Ok(TripId::new(id))
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: TripId) -> Result<Trip> {
        let row = sqlx::query(
            "SELECT trip_id, origin, destination, distance, cost FROM trips WHERE trip_id = $1",
        )
        .bind(id.as_i32())
        .fetch_one(&self.pool)
        .await
        .map_err(absent_as_not_found("trip", id.as_i32()))?;

        Self::row_to_trip(row)
    }

    #[tracing::instrument(skip(self))]
    async fn update(&self, id: TripId, details: &TripDetails) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE trips
            SET origin = $1, destination = $2, distance = $3, cost = $4
            WHERE trip_id = $5
            "#,
        )
        .bind(&details.origin)
        .bind(&details.destination)
        .bind(details.distance)
        .bind(details.cost)
        .bind(id.as_i32())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("trip", id));
        }
        Ok(())
    }
}

/// PostgreSQL-backed reservation repository.
#[derive(Clone)]
pub struct PostgresReservationRepository {
    pool: PgPool,
}

impl PostgresReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the `reservations` table if needed.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations/reservations")
            .run(&self.pool)
            .await?;
        Ok(())
    }

    fn row_to_reservation(row: PgRow) -> Result<Reservation> {
        Ok(Reservation {
            id: ReservationId::new(row.try_get("reservation_id")?),
            user_id: UserId::new(row.try_get("user_id")?),
            trip_id: TripId::new(row.try_get("trip_id")?),
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl ReservationRepository for PostgresReservationRepository {
    #[tracing::instrument(skip(self))]
    async fn create(&self, reservation: NewReservation) -> Result<Reservation> {
        // A single INSERT .. RETURNING keeps id assignment and the write atomic.
        let row = sqlx::query(
            r#"
            INSERT INTO reservations (user_id, trip_id, created_at)
            VALUES ($1, $2, $3)
            RETURNING reservation_id, user_id, trip_id, created_at
            "#,
        )
        .bind(reservation.user_id.as_i32())
        .bind(reservation.trip_id.as_i32())
        .bind(reservation.created_at)
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_reservation(row)
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: ReservationId) -> Result<Reservation> {
        let row = sqlx::query(
            r#"
            SELECT reservation_id, user_id, trip_id, created_at
            FROM reservations
            WHERE reservation_id = $1
            "#,
        )
        .bind(id.as_i32())
        .fetch_one(&self.pool)
        .await
        .map_err(absent_as_not_found("reservation", id.as_i32()))?;

        Self::row_to_reservation(row)
    }
}
