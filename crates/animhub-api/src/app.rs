//! Application builder: wires router, state, and background jobs into a
//! running server.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;

use animhub_core::config::AppConfig;
use animhub_core::error::AppError;
use animhub_storage::StorageLayout;
use animhub_worker::{CronScheduler, JobExecutor, RetentionJobHandler, RetentionSweeper};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Retention sweep over the state's working directories, honoring its leases.
pub fn build_sweeper(state: &AppState) -> RetentionSweeper {
    RetentionSweeper::new(
        state.layout.sweep_roots(),
        Duration::from_secs(state.config.retention.max_age_seconds),
        state.leases.clone(),
    )
}

/// Executor with every background job registered.
pub fn build_executor(state: &AppState) -> JobExecutor {
    let mut executor = JobExecutor::new();
    executor.register(Arc::new(RetentionJobHandler::new(build_sweeper(state))));
    executor
}

/// Runs the AnimHub server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting AnimHub server...");

    // ── Step 1: Working directories ──────────────────────────────
    let layout = StorageLayout::from_config(&config.storage)?;
    layout.ensure_dirs().await?;
    tracing::info!(
        uploads = %layout.uploads.display(),
        outputs = %layout.outputs.display(),
        descriptors = %layout.descriptors.display(),
        "Working directories ready"
    );

    // ── Step 2: Shared state ─────────────────────────────────────
    let state = AppState::new(config.clone(), layout)?;

    // ── Step 3: Retention sweep ──────────────────────────────────
    let mut scheduler = start_retention(&config, &state).await?;

    // ── Step 4: HTTP server ──────────────────────────────────────
    let app = build_app(state);
    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("AnimHub listening on http://{}", addr);
    tracing::info!("API status: http://{}/api/status", addr);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
            let _ = shutdown_tx.send(true);
        })
        .into_future();

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    tokio::select! {
        result = server => {
            result.map_err(|e| AppError::internal(format!("Server error: {}", e)))?;
        }
        _ = grace_expired(shutdown_rx, grace) => {
            tracing::warn!(
                grace_seconds = grace.as_secs(),
                "In-flight requests did not finish in time, shutting down anyway"
            );
        }
    }

    // ── Step 5: Background jobs ──────────────────────────────────
    if let Some(scheduler) = scheduler.as_mut() {
        scheduler.shutdown().await?;
    }

    tracing::info!("AnimHub server shut down gracefully");
    Ok(())
}

/// Run the startup sweep and schedule the periodic one.
async fn start_retention(
    config: &AppConfig,
    state: &AppState,
) -> Result<Option<CronScheduler>, AppError> {
    if !config.retention.enabled {
        tracing::info!("Retention sweep disabled");
        return Ok(None);
    }

    let executor = Arc::new(build_executor(state));

    if config.retention.sweep_on_startup {
        if let Err(e) = executor.execute(RetentionJobHandler::JOB_TYPE).await {
            tracing::warn!("Startup sweep failed: {}", e);
        }
    }

    let scheduler = CronScheduler::new(Arc::clone(&executor)).await?;
    scheduler
        .register_repeated(
            RetentionJobHandler::JOB_TYPE,
            Duration::from_secs(config.retention.interval_seconds),
        )
        .await?;
    scheduler.start().await?;

    Ok(Some(scheduler))
}

/// Resolves `grace` after shutdown was requested; never resolves otherwise.
async fn grace_expired(mut shutdown_rx: watch::Receiver<bool>, grace: Duration) {
    if shutdown_rx.wait_for(|requested| *requested).await.is_err() {
        std::future::pending::<()>().await;
    }
    tokio::time::sleep(grace).await;
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
