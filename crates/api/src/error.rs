//! API error types with HTTP response mapping.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::wire::ErrorBody;
use coordinator::{CoordinatorError, ErrorKind};
use store::StoreError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed path parameter or body.
    BadRequest(String),
    /// Reservation coordinator failure.
    Coordinator(CoordinatorError),
    /// Repository failure in the identity or trip service.
    Store(StoreError),
    /// Internal server error.
    Internal(String),
}

impl ApiError {
    /// Category of the error, shared with the coordinator's taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::BadRequest(_) => ErrorKind::InvalidArgument,
            ApiError::Coordinator(err) => err.kind(),
            ApiError::Store(err) if err.is_not_found() => ErrorKind::NotFound,
            ApiError::Store(_) | ApiError::Internal(_) => ErrorKind::Internal,
        }
    }
}

fn status_and_code(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::InvalidArgument => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ErrorKind::Unavailable => (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE"),
        ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let (status, code) = status_and_code(kind);
        metrics::counter!("http_errors_total", "type" => kind.as_str()).increment(1);

        let message = match self {
            ApiError::BadRequest(msg) | ApiError::Internal(msg) => msg,
            ApiError::Coordinator(err) => err.to_string(),
            ApiError::Store(err) => err.to_string(),
        };

        if kind == ErrorKind::Internal {
            tracing::error!(error = %message, "internal server error");
        }

        let body = ErrorBody {
            error: message,
            code: code.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<CoordinatorError> for ApiError {
    fn from(err: CoordinatorError) -> Self {
        ApiError::Coordinator(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Parses an integer identifier from a path segment.
pub fn parse_id<T: From<i32>>(raw: &str) -> Result<T, ApiError> {
    raw.parse::<i32>()
        .map(T::from)
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))
}
