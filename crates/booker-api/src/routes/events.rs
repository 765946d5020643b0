//! Routes for events.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use booker_core::model::{Event, EventFields};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::extract::{EntityId, JsonBody};
use crate::state::AppState;

/// GET /events
#[instrument(skip(state))]
async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    let events = state.events.list_events().await?;
    Ok(Json(events))
}

/// GET /events/{id}
#[instrument(skip(state))]
async fn get_event(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Json<Event>, ApiError> {
    let event = state.events.get_event(id).await?;
    Ok(Json(event))
}

/// POST /events
#[instrument(skip(state, fields))]
async fn create_event(
    State(state): State<AppState>,
    JsonBody(fields): JsonBody<EventFields>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let id = state.events.create_event(&fields).await?;

    info!(event_id = id, "event created");

    Ok((StatusCode::CREATED, Json(fields.into_event(id))))
}

/// PUT /events/{id}
#[instrument(skip(state, fields))]
async fn update_event(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    JsonBody(fields): JsonBody<EventFields>,
) -> Result<Json<Event>, ApiError> {
    state.events.update_event(id, &fields).await?;

    info!(event_id = id, "event updated");

    Ok(Json(fields.into_event(id)))
}

/// DELETE /events/{id}
#[instrument(skip(state))]
async fn delete_event(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<StatusCode, ApiError> {
    state.events.delete_event(id).await?;

    info!(event_id = id, "event deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for events.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
}
