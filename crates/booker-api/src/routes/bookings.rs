//! Routes for bookings.
//!
//! Referenced users and events are not looked up here; the store's foreign
//! keys reject dangling references and the failure surfaces as a 500.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use booker_core::model::{Booking, BookingFields};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::extract::{EntityId, JsonBody};
use crate::state::AppState;

/// GET /bookings
#[instrument(skip(state))]
async fn list_bookings(State(state): State<AppState>) -> Result<Json<Vec<Booking>>, ApiError> {
    let bookings = state.bookings.list_bookings().await?;
    Ok(Json(bookings))
}

/// GET /bookings/{id}
#[instrument(skip(state))]
async fn get_booking(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Json<Booking>, ApiError> {
    let booking = state.bookings.get_booking(id).await?;
    Ok(Json(booking))
}

/// POST /bookings
#[instrument(skip(state))]
async fn create_booking(
    State(state): State<AppState>,
    JsonBody(fields): JsonBody<BookingFields>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    let id = state.bookings.create_booking(&fields).await?;

    info!(booking_id = id, "booking created");

    Ok((StatusCode::CREATED, Json(fields.into_booking(id))))
}

/// PUT /bookings/{id}
#[instrument(skip(state))]
async fn update_booking(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    JsonBody(fields): JsonBody<BookingFields>,
) -> Result<Json<Booking>, ApiError> {
    state.bookings.update_booking(id, &fields).await?;

    info!(booking_id = id, "booking updated");

    Ok(Json(fields.into_booking(id)))
}

/// DELETE /bookings/{id}
#[instrument(skip(state))]
async fn delete_booking(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<StatusCode, ApiError> {
    state.bookings.delete_booking(id).await?;

    info!(booking_id = id, "booking deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for bookings.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route(
            "/bookings/{id}",
            get(get_booking).put(update_booking).delete(delete_booking),
        )
}
