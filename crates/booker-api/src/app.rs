//! Router composition and the HTTP serve loop.

use std::any::Any;
use std::future::Future;
use std::time::Duration;

use axum::Router;
use axum::http::{StatusCode, Uri};
use axum::response::Response;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinError;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::error::{AppError, ErrorBody};
use crate::routes;
use crate::state::AppState;

/// Builds the full application router: health plus the three entity
/// routers, wrapped in access logging, panic recovery and a per-request
/// timeout.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let routes = Router::new()
        .merge(routes::health::router())
        .merge(routes::users::router())
        .merge(routes::events::router())
        .merge(routes::bookings::router());

    with_middleware(routes, request_timeout).with_state(state)
}

fn with_middleware(router: Router<AppState>, request_timeout: Duration) -> Router<AppState> {
    router
        .fallback(not_found)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

async fn not_found(uri: Uri) -> Response {
    ErrorBody {
        error: "not_found",
        message: format!("no route for {uri}"),
    }
    .into_response_with(StatusCode::NOT_FOUND)
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else {
        "non-string panic payload"
    };
    error!(panic = detail, "request handler panicked");

    ErrorBody {
        error: "internal_error",
        message: "internal server error".to_string(),
    }
    .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Serves `router` on `listener` until `shutdown` resolves, then stops
/// accepting connections and gives in-flight requests `grace` to finish.
/// Requests still running after that are dropped.
///
/// # Errors
///
/// Returns `AppError::Server` if the server fails before or during
/// shutdown.
pub async fn serve<F>(
    listener: TcpListener,
    router: Router,
    shutdown: F,
    grace: Duration,
) -> Result<(), AppError>
where
    F: Future<Output = ()>,
{
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                // A dropped sender also means stop.
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        joined = &mut server => {
            error!("http server stopped unexpectedly");
            return flatten(joined);
        }
        () = shutdown => {
            info!("shutdown signal received, draining in-flight requests");
        }
    }

    let _ = stop_tx.send(());
    if let Ok(joined) = tokio::time::timeout(grace, &mut server).await {
        flatten(joined)?;
        info!("http server stopped");
    } else {
        warn!(grace_secs = grace.as_secs_f64(), "grace period elapsed, dropping in-flight requests");
        server.abort();
    }
    Ok(())
}

fn flatten(joined: Result<std::io::Result<()>, JoinError>) -> Result<(), AppError> {
    match joined {
        Ok(result) => result.map_err(AppError::from),
        Err(err) => Err(AppError::Server(std::io::Error::other(err))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use booker_test_support::InMemoryStorage;
    use serde_json::Value;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState::new(Arc::new(InMemoryStorage::new()))
    }

    async fn boom() -> &'static str {
        panic!("handler blew up")
    }

    async fn slow() -> &'static str {
        tokio::time::sleep(Duration::from_secs(5)).await;
        "done"
    }

    fn router_with_faults(request_timeout: Duration) -> Router {
        let routes = Router::new()
            .route("/boom", get(boom))
            .route("/slow", get(slow));
        with_middleware(routes, request_timeout).with_state(test_state())
    }

    async fn send(app: Router, uri: &str) -> Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app.oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_panicking_handler_becomes_json_500() {
        let app = router_with_faults(Duration::from_secs(5));

        let response = send(app.clone(), "/boom").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(json["error"], "internal_error");

        // The router keeps serving after the panic.
        let response = send(app, "/nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_slow_handler_times_out_with_408() {
        let app = router_with_faults(Duration::from_millis(20));

        let response = send(app, "/slow").await;

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn test_unknown_route_returns_json_404() {
        let app = build_router(test_state(), Duration::from_secs(5));

        let response = send(app, "/api/v1/nonexistent").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_serve_answers_then_stops_on_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = build_router(test_state(), Duration::from_secs(5));
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve(
            listener,
            app,
            async move {
                let _ = stop_rx.await;
            },
            Duration::from_secs(5),
        ));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200"), "got: {response}");

        stop_tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_serve_gives_up_on_in_flight_requests_after_grace() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router_with_faults(Duration::from_secs(30));
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve(
            listener,
            app,
            async move {
                let _ = stop_rx.await;
            },
            Duration::from_millis(50),
        ));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /slow HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        stop_tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(2), server)
            .await
            .expect("serve did not return within the grace period");
        result.unwrap().unwrap();
    }
}
