//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency. Each service
//! has its own migration set; all three are applied to the same database here.
//! Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use common::{ReservationId, TripDetails, TripId, UserId};
use sqlx::PgPool;
use store::{
    NewReservation, PostgresReservationRepository, PostgresTripRepository, PostgresUserRepository,
    ReservationRepository, StoreError, TripRepository, UserRepository,
};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let pool = PgPool::connect(&connection_string).await.unwrap();
            PostgresUserRepository::new(pool.clone())
                .run_migrations()
                .await
                .unwrap();
            PostgresTripRepository::new(pool.clone())
                .run_migrations()
                .await
                .unwrap();
            PostgresReservationRepository::new(pool.clone())
                .run_migrations()
                .await
                .unwrap();
            pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh pool with cleared tables
async fn get_test_pool() -> PgPool {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE users, trips, reservations RESTART IDENTITY")
        .execute(&pool)
        .await
        .unwrap();

    pool
}

fn nyc_to_bos() -> TripDetails {
    TripDetails::new("NYC", "BOS", 200, 150)
}

#[tokio::test]
async fn create_get_and_delete_user() {
    let repo = PostgresUserRepository::new(get_test_pool().await);

    let id = repo.create("Alice").await.unwrap();
    assert!(id.is_positive());

    let user = repo.get(id).await.unwrap();
    assert_eq!(user.user_id, id);
    assert_eq!(user.name, "Alice");

    repo.delete(id).await.unwrap();
    let err = repo.get(id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { entity: "user", .. }));
}

#[tokio::test]
async fn deleting_missing_user_is_not_found() {
    let repo = PostgresUserRepository::new(get_test_pool().await);

    let err = repo.delete(UserId::new(4242)).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn create_and_update_trip() {
    let repo = PostgresTripRepository::new(get_test_pool().await);

    let id = repo.create(&nyc_to_bos()).await.unwrap();
    assert_eq!(repo.get(id).await.unwrap().details, nyc_to_bos());

    let replacement = TripDetails::new("SFO", "LAX", 380, 90);
    repo.update(id, &replacement).await.unwrap();

    let trip = repo.get(id).await.unwrap();
    assert_eq!(trip.trip_id, id);
    assert_eq!(trip.details, replacement);
}

#[tokio::test]
async fn updating_missing_trip_is_not_found() {
    let repo = PostgresTripRepository::new(get_test_pool().await);

    let err = repo
        .update(TripId::new(4242), &nyc_to_bos())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { entity: "trip", .. }));
}

#[tokio::test]
async fn reservation_roundtrip_preserves_timestamp() {
    let repo = PostgresReservationRepository::new(get_test_pool().await);
    let created_at = Utc::now().trunc_subsecs(0);

    let stored = repo
        .create(NewReservation {
            user_id: UserId::new(1),
            trip_id: TripId::new(5),
            created_at,
        })
        .await
        .unwrap();

    assert!(stored.id.is_positive());
    assert_eq!(stored.created_at, created_at);

    let loaded = repo.get(stored.id).await.unwrap();
    assert_eq!(loaded, stored);
}

#[tokio::test]
async fn reservation_references_are_not_enforced() {
    let pool = get_test_pool().await;
    let users = PostgresUserRepository::new(pool.clone());
    let reservations = PostgresReservationRepository::new(pool);

    // Neither user 77 nor trip 88 exists in this database.
    let stored = reservations
        .create(NewReservation {
            user_id: UserId::new(77),
            trip_id: TripId::new(88),
            created_at: Utc::now().trunc_subsecs(0),
        })
        .await
        .unwrap();

    assert!(users.get(UserId::new(77)).await.unwrap_err().is_not_found());
    assert_eq!(reservations.get(stored.id).await.unwrap().trip_id, TripId::new(88));
}

#[tokio::test]
async fn missing_reservation_is_not_found() {
    let repo = PostgresReservationRepository::new(get_test_pool().await);

    let err = repo.get(ReservationId::new(4242)).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::NotFound {
            entity: "reservation",
            id: 4242
        }
    ));
}
