//! Integration tests for the booking endpoints.

mod common;

use axum::Router;
use axum::http::StatusCode;

/// Creates one user and one event and returns their ids.
async fn seed(app: &Router) -> (i64, i64) {
    let (status, user) = common::post_json(
        app.clone(),
        "/users",
        &serde_json::json!({ "name": "Ann", "email": "ann@x.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, event) = common::post_json(
        app.clone(),
        "/events",
        &serde_json::json!({ "title": "Launch", "description": "Rooftop" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    (user["id"].as_i64().unwrap(), event["id"].as_i64().unwrap())
}

#[tokio::test]
async fn test_booking_with_unknown_references_returns_500() {
    let app = common::build_test_app();

    let (status, json) = common::post_json(
        app,
        "/bookings",
        &serde_json::json!({ "event_id": 999, "user_id": 999 }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "constraint_violation");
}

#[tokio::test]
async fn test_booking_round_trip() {
    let app = common::build_test_app();
    let (user_id, event_id) = seed(&app).await;

    let (status, created) = common::post_json(
        app.clone(),
        "/bookings",
        &serde_json::json!({ "event_id": event_id, "user_id": user_id }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = common::get_json(app, &format!("/bookings/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
    assert_eq!(fetched["event_id"], event_id);
    assert_eq!(fetched["user_id"], user_id);
}

#[tokio::test]
async fn test_deleting_user_removes_their_bookings() {
    let app = common::build_test_app();
    let (user_id, event_id) = seed(&app).await;
    let (_, created) = common::post_json(
        app.clone(),
        "/bookings",
        &serde_json::json!({ "event_id": event_id, "user_id": user_id }),
    )
    .await;
    let booking_id = created["id"].as_i64().unwrap();

    let (status, _) = common::delete(app.clone(), &format!("/users/{user_id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = common::get_json(app.clone(), &format!("/bookings/{booking_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, json) = common::get_json(app, "/bookings").await;
    assert_eq!(json, serde_json::json!([]));
}

#[tokio::test]
async fn test_booking_body_with_string_ids_returns_400() {
    let app = common::build_test_app();

    let (status, json) = common::post_json(
        app,
        "/bookings",
        &serde_json::json!({ "event_id": "one", "user_id": 1 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}
