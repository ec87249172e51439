use serde::{Deserialize, Serialize};

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wraps a raw identifier value.
            pub fn new(value: i32) -> Self {
                Self(value)
            }

            /// Returns the raw identifier value.
            pub fn as_i32(&self) -> i32 {
                self.0
            }

            /// Returns true if the identifier could have been assigned by a store.
            pub fn is_positive(&self) -> bool {
                self.0 > 0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

integer_id! {
    /// Identifier of a user, assigned by the identity store.
    UserId
}

integer_id! {
    /// Identifier of a trip, assigned by the trip store.
    TripId
}

integer_id! {
    /// Identifier of a reservation, assigned by the reservation store.
    ReservationId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_check_rejects_zero_and_negative() {
        assert!(UserId::new(1).is_positive());
        assert!(!UserId::new(0).is_positive());
        assert!(!TripId::new(-4).is_positive());
    }

    #[test]
    fn id_serializes_as_bare_integer() {
        let json = serde_json::to_string(&ReservationId::new(10)).unwrap();
        assert_eq!(json, "10");

        let id: TripId = serde_json::from_str("5").unwrap();
        assert_eq!(id, TripId::new(5));
    }

    #[test]
    fn id_display_matches_raw_value() {
        assert_eq!(UserId::new(42).to_string(), "42");
        assert_eq!(i32::from(ReservationId::new(7)), 7);
    }
}
