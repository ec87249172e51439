//! Identity service endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::User;
use common::wire::{CreateUserRequest, CreateUserResponse, MessageResponse};
use store::UserRepository;

use crate::error::{ApiError, parse_id};

/// POST /users: registers a user.
#[tracing::instrument(skip(repo, payload))]
pub async fn create<U: UserRepository + 'static>(
    State(repo): State<Arc<U>>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateUserResponse>), ApiError> {
    metrics::counter!("identity_requests_total", "method" => "create_user").increment(1);
    let Json(req) = payload?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }

    let user_id = repo.create(name).await?;
    tracing::info!(%user_id, "user created");

    Ok((StatusCode::CREATED, Json(CreateUserResponse { user_id })))
}

/// GET /users/{id}
#[tracing::instrument(skip(repo))]
pub async fn get<U: UserRepository + 'static>(
    State(repo): State<Arc<U>>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    metrics::counter!("identity_requests_total", "method" => "get_user").increment(1);
    let user_id = parse_id(&id)?;

    let user = repo.get(user_id).await?;
    Ok(Json(user))
}

/// DELETE /users/{id}
///
/// Reservations that reference the user are left untouched.
#[tracing::instrument(skip(repo))]
pub async fn delete<U: UserRepository + 'static>(
    State(repo): State<Arc<U>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    metrics::counter!("identity_requests_total", "method" => "delete_user").increment(1);
    let user_id = parse_id(&id)?;

    repo.delete(user_id).await?;
    tracing::info!(%user_id, "user deleted");

    Ok(Json(MessageResponse {
        message: format!("User with ID {user_id} deleted successfully"),
    }))
}
