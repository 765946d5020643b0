//! Routes for users.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use booker_core::model::{User, UserFields};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::extract::{EntityId, JsonBody};
use crate::state::AppState;

/// GET /users
#[instrument(skip(state))]
async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.users.list_users().await?;
    Ok(Json(users))
}

/// GET /users/{id}
#[instrument(skip(state))]
async fn get_user(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Json<User>, ApiError> {
    let user = state.users.get_user(id).await?;
    Ok(Json(user))
}

/// POST /users
#[instrument(skip(state, fields))]
async fn create_user(
    State(state): State<AppState>,
    JsonBody(fields): JsonBody<UserFields>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    fields.validate()?;
    let id = state.users.create_user(&fields).await?;

    info!(user_id = id, "user created");

    Ok((StatusCode::CREATED, Json(fields.into_user(id))))
}

/// PUT /users/{id}
#[instrument(skip(state, fields))]
async fn update_user(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    JsonBody(fields): JsonBody<UserFields>,
) -> Result<Json<User>, ApiError> {
    fields.validate()?;
    state.users.update_user(id, &fields).await?;

    info!(user_id = id, "user updated");

    Ok(Json(fields.into_user(id)))
}

/// DELETE /users/{id}
#[instrument(skip(state))]
async fn delete_user(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<StatusCode, ApiError> {
    state.users.delete_user(id).await?;

    info!(user_id = id, "user deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for users.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
