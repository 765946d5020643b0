//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use booker_storage::PgStorage;
use booker_test_support::InMemoryStorage;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use booker_api::app;
use booker_api::state::AppState;

/// Build the full app router over an empty `InMemoryStorage`. Uses the same
/// route and middleware stack as `main.rs`.
pub fn build_test_app() -> Router {
    app::build_router(
        AppState::new(Arc::new(InMemoryStorage::new())),
        Duration::from_secs(5),
    )
}

/// Build the full app router over a real `PgStorage`.
pub fn build_pg_app(pool: PgPool) -> Router {
    app::build_router(
        AppState::new(Arc::new(PgStorage::new(pool))),
        Duration::from_secs(5),
    )
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    if body_bytes.is_empty() {
        return (status, serde_json::Value::Null);
    }
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, json_request("POST", uri, body)).await
}

/// Send a PUT request with a JSON body and return the response.
pub async fn put_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, json_request("PUT", uri, body)).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, empty_request("GET", uri)).await
}

/// Send a DELETE request and return the response. The body is `Null` when
/// the response has none.
pub async fn delete(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, empty_request("DELETE", uri)).await
}
