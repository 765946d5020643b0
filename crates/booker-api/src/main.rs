//! Booker API server entry point.

use std::sync::Arc;

use booker_api::app;
use booker_api::config::AppConfig;
use booker_api::error::AppError;
use booker_api::state::AppState;
use booker_api::telemetry;
use booker_core::repository::StorageLifecycle;
use booker_storage::PgStorage;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = AppConfig::load()?;

    telemetry::init(config.env);

    tracing::info!(env = ?config.env, "Starting Booker API server");

    // Create database connection pool.
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database_url)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "failed to connect to database"))?;
    let storage = Arc::new(PgStorage::new(pool));

    // Build router.
    let router = app::build_router(
        AppState::new(Arc::clone(&storage)),
        config.http_server.request_timeout(),
    );

    // Start server.
    let listener = match TcpListener::bind(&config.http_server.address).await {
        Ok(listener) => listener,
        Err(e) => {
            storage.close().await;
            return Err(e.into());
        }
    };
    tracing::info!("Listening on {}", config.http_server.address);

    let served = app::serve(
        listener,
        router,
        shutdown_signal(),
        config.http_server.shutdown_timeout(),
    )
    .await;

    storage.close().await;
    match &served {
        Ok(()) => tracing::info!("shutdown complete"),
        Err(e) => tracing::error!(error = %e, "server stopped with error"),
    }
    served
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
