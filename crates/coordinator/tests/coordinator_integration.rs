//! Integration tests for the reservation coordinator.

use std::sync::Arc;

use common::{ReservationId, TripDetails, TripId, UserId};
use coordinator::{
    CoordinatorError, CreateReservationRequest, ErrorKind, InMemoryIdentityClient,
    InMemoryTripClient, Participant, ReservationCoordinator,
};
use store::InMemoryReservationRepository;

type TestCoordinator = ReservationCoordinator<
    InMemoryReservationRepository,
    InMemoryIdentityClient,
    InMemoryTripClient,
>;

struct TestHarness {
    coordinator: TestCoordinator,
    reservations: InMemoryReservationRepository,
    identity: InMemoryIdentityClient,
    trips: InMemoryTripClient,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_stores(
            InMemoryReservationRepository::new(),
            InMemoryTripClient::new(),
        )
    }

    fn with_stores(reservations: InMemoryReservationRepository, trips: InMemoryTripClient) -> Self {
        let identity = InMemoryIdentityClient::new();

        let coordinator =
            ReservationCoordinator::new(reservations.clone(), identity.clone(), trips.clone());

        Self {
            coordinator,
            reservations,
            identity,
            trips,
        }
    }

    async fn reserve(&self, user_id: UserId, trip: TripDetails) -> ReservationId {
        self.coordinator
            .create_reservation(CreateReservationRequest::new(user_id, trip))
            .await
            .unwrap()
            .id
    }
}

fn nyc_to_bos() -> TripDetails {
    TripDetails::new("NYC", "BOS", 200, 150)
}

#[tokio::test]
async fn test_happy_path_create_and_read() {
    let h = TestHarness::with_stores(
        InMemoryReservationRepository::starting_at(10),
        InMemoryTripClient::starting_at(5),
    );
    let alice = h.identity.add_user("Alice");
    assert_eq!(alice, UserId::new(1));

    let reservation = h
        .coordinator
        .create_reservation(CreateReservationRequest::new(alice, nyc_to_bos()))
        .await
        .unwrap();

    assert_eq!(reservation.id, ReservationId::new(10));
    assert_eq!(reservation.user_id, alice);
    assert_eq!(reservation.trip_id, TripId::new(5));

    let details = h
        .coordinator
        .get_reservation(ReservationId::new(10))
        .await
        .unwrap();

    assert_eq!(details.reservation_id, reservation.id);
    assert_eq!(details.user_name, "Alice");
    assert_eq!(details.origin, "NYC");
    assert_eq!(details.destination, "BOS");
    assert_eq!(details.distance, 200);
    assert_eq!(details.cost, 150);
    assert_eq!(details.created_at, reservation.created_at);
}

#[tokio::test]
async fn test_validation_failure_reaches_no_store() {
    let h = TestHarness::new();
    let alice = h.identity.add_user("Alice");

    let cases = [
        CreateReservationRequest {
            user_id: alice,
            trip: None,
        },
        CreateReservationRequest::new(0, nyc_to_bos()),
        CreateReservationRequest::new(-4, nyc_to_bos()),
        CreateReservationRequest::new(alice, TripDetails::new("", "BOS", 200, 150)),
        CreateReservationRequest::new(alice, TripDetails::new("   ", "BOS", 200, 150)),
        CreateReservationRequest::new(alice, TripDetails::new("NYC", "", 200, 150)),
        CreateReservationRequest::new(alice, TripDetails::new("NYC", "\t ", 200, 150)),
        CreateReservationRequest::new(alice, TripDetails::new("NYC", "BOS", 0, 150)),
        CreateReservationRequest::new(alice, TripDetails::new("NYC", "BOS", -1, 150)),
        CreateReservationRequest::new(alice, TripDetails::new("NYC", "BOS", 200, 0)),
        CreateReservationRequest::new(alice, TripDetails::new("NYC", "BOS", 200, -25)),
    ];

    for request in cases {
        let described = format!("{request:?}");
        let err = h.coordinator.create_reservation(request).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{described}");
        assert_eq!(h.identity.get_user_calls(), 0, "{described}");
        assert_eq!(h.trips.create_calls(), 0, "{described}");
        assert_eq!(h.reservations.create_calls(), 0, "{described}");
    }

    assert_eq!(h.trips.trip_count(), 0);
    assert_eq!(h.reservations.reservation_count().await, 0);
}

#[tokio::test]
async fn test_unknown_user_stops_before_trip_creation() {
    let h = TestHarness::new();

    let err = h
        .coordinator
        .create_reservation(CreateReservationRequest::new(42, nyc_to_bos()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CoordinatorError::NotFound {
            participant: Participant::IdentityStore,
            ..
        }
    ));
    assert_eq!(h.trips.trip_count(), 0);
    assert_eq!(h.reservations.reservation_count().await, 0);
}

#[tokio::test]
async fn test_unreachable_identity_store_is_unavailable() {
    let h = TestHarness::new();
    let alice = h.identity.add_user("Alice");
    h.identity.set_unavailable(true);

    let err = h
        .coordinator
        .create_reservation(CreateReservationRequest::new(alice, nyc_to_bos()))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unavailable);
    assert_eq!(h.trips.create_calls(), 0);
}

#[tokio::test]
async fn test_trip_failure_after_commit_orphans_trip() {
    let h = TestHarness::new();
    let alice = h.identity.add_user("Alice");

    // The trip store commits the trip but the reply never arrives.
    h.trips.set_fail_after_create(true);

    let err = h
        .coordinator
        .create_reservation(CreateReservationRequest::new(alice, nyc_to_bos()))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unavailable);
    assert_eq!(err.participant(), Some(Participant::TripStore));
    assert_eq!(h.trips.trip_count(), 1);
    assert_eq!(h.reservations.create_calls(), 0);
}

#[tokio::test]
async fn test_reservation_write_failure_orphans_trip() {
    let h = TestHarness::new();
    let alice = h.identity.add_user("Alice");
    h.reservations.set_fail_on_create(true);

    let err = h
        .coordinator
        .create_reservation(CreateReservationRequest::new(alice, nyc_to_bos()))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Internal);
    assert_eq!(h.trips.trip_count(), 1);
    assert_eq!(h.reservations.reservation_count().await, 0);

    // A later attempt succeeds and creates a second trip.
    h.reservations.set_fail_on_create(false);
    let id = h.reserve(alice, nyc_to_bos()).await;

    let details = h.coordinator.get_reservation(id).await.unwrap();
    assert_eq!(details.trip_id, TripId::new(2));
    assert_eq!(h.trips.trip_count(), 2);
}

#[tokio::test]
async fn test_read_after_user_deleted_fails() {
    let h = TestHarness::new();
    let alice = h.identity.add_user("Alice");
    let id = h.reserve(alice, nyc_to_bos()).await;

    h.identity.remove_user(alice);

    let err = h.coordinator.get_reservation(id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);
    assert_eq!(err.participant(), Some(Participant::IdentityStore));
    assert_eq!(h.trips.get_calls(), 0);
}

#[tokio::test]
async fn test_read_after_trip_deleted_fails() {
    let h = TestHarness::new();
    let alice = h.identity.add_user("Alice");
    let id = h.reserve(alice, nyc_to_bos()).await;

    let trip_id = h.coordinator.get_reservation(id).await.unwrap().trip_id;
    h.trips.remove_trip(trip_id);

    let err = h.coordinator.get_reservation(id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);
    assert_eq!(err.participant(), Some(Participant::TripStore));
}

#[tokio::test]
async fn test_read_of_missing_reservation_is_not_found() {
    let h = TestHarness::new();

    let err = h
        .coordinator
        .get_reservation(ReservationId::new(99))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(h.identity.get_user_calls(), 0);
    assert_eq!(h.trips.get_calls(), 0);
}

#[tokio::test]
async fn test_repeated_reads_are_identical() {
    let h = TestHarness::new();
    let alice = h.identity.add_user("Alice");
    let id = h.reserve(alice, nyc_to_bos()).await;

    let first = h.coordinator.get_reservation(id).await.unwrap();
    let second = h.coordinator.get_reservation(id).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_concurrent_creates_are_independent() {
    let h = Arc::new(TestHarness::new());
    let alice = h.identity.add_user("Alice");
    let bob = h.identity.add_user("Bob");

    let mut handles = Vec::new();
    for i in 0..10 {
        let h = Arc::clone(&h);
        let user_id = if i % 2 == 0 { alice } else { bob };
        handles.push(tokio::spawn(async move {
            h.reserve(user_id, TripDetails::new("NYC", "BOS", 200 + i, 150))
                .await
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort();
    ids.dedup();

    assert_eq!(ids.len(), 10);
    assert_eq!(h.trips.trip_count(), 10);
    assert_eq!(h.reservations.reservation_count().await, 10);

    for id in ids {
        let details = h.coordinator.get_reservation(id).await.unwrap();
        assert!(details.user_name == "Alice" || details.user_name == "Bob");
    }
}
