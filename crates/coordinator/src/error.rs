//! Coordinator error types.

use common::InvalidTrip;
use store::StoreError;
use thiserror::Error;

/// The participant a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participant {
    IdentityStore,
    TripStore,
    ReservationStore,
}

impl std::fmt::Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Participant::IdentityStore => "identity store",
            Participant::TripStore => "trip store",
            Participant::ReservationStore => "reservation store",
        };
        f.write_str(name)
    }
}

/// Failure reported by a remote participant.
///
/// Every remote call yields `Result<T, RemoteError>`, so the coordinator can
/// match on the category instead of inspecting transport details.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The remote store answered that the entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The remote store could not be reached or sent an unreadable reply.
    #[error("unreachable: {0}")]
    Unavailable(String),

    /// The remote store answered with any other failure.
    #[error("rejected: {0}")]
    Rejected(String),
}

/// Category of a coordinator failure, as reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    Unavailable,
    Internal,
}

impl ErrorKind {
    /// Label used for the `type` dimension of error metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Unavailable => "network",
            ErrorKind::Internal => "database",
        }
    }
}

/// Errors returned by the reservation coordinator.
///
/// Each variant carries the first failure observed; no later step runs after
/// one of these is produced.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// Client-supplied data failed a precondition. No call was made.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A referenced entity does not exist in its owning store.
    #[error("Not found in {participant}: {message}")]
    NotFound {
        participant: Participant,
        message: String,
    },

    /// A remote participant could not be reached or refused the call.
    #[error("{participant} unavailable: {source}")]
    Unavailable {
        participant: Participant,
        #[source]
        source: RemoteError,
    },

    /// The local reservation store failed for a reason other than absence.
    #[error("Reservation store error: {0}")]
    Database(#[source] StoreError),
}

impl CoordinatorError {
    /// Classifies a remote failure where absence is meaningful to the caller.
    pub(crate) fn from_remote(participant: Participant, err: RemoteError) -> Self {
        match err {
            RemoteError::NotFound(message) => CoordinatorError::NotFound {
                participant,
                message,
            },
            source => CoordinatorError::Unavailable {
                participant,
                source,
            },
        }
    }

    /// Classifies any remote failure as the participant being unavailable.
    pub(crate) fn unavailable(participant: Participant, source: RemoteError) -> Self {
        CoordinatorError::Unavailable {
            participant,
            source,
        }
    }

    /// Classifies a reservation store failure.
    pub(crate) fn from_store(err: StoreError) -> Self {
        if err.is_not_found() {
            CoordinatorError::NotFound {
                participant: Participant::ReservationStore,
                message: err.to_string(),
            }
        } else {
            CoordinatorError::Database(err)
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CoordinatorError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            CoordinatorError::NotFound { .. } => ErrorKind::NotFound,
            CoordinatorError::Unavailable { .. } => ErrorKind::Unavailable,
            CoordinatorError::Database(_) => ErrorKind::Internal,
        }
    }

    /// Returns the participant that failed, if any was called.
    pub fn participant(&self) -> Option<Participant> {
        match self {
            CoordinatorError::InvalidArgument(_) => None,
            CoordinatorError::NotFound { participant, .. }
            | CoordinatorError::Unavailable { participant, .. } => Some(*participant),
            CoordinatorError::Database(_) => Some(Participant::ReservationStore),
        }
    }
}

impl From<InvalidTrip> for CoordinatorError {
    fn from(err: InvalidTrip) -> Self {
        CoordinatorError::InvalidArgument(err.to_string())
    }
}

/// Convenience type alias for coordinator results.
pub type Result<T> = std::result::Result<T, CoordinatorError>;
