//! Route definitions for the AnimHub HTTP API.
//!
//! API routes are mounted under `/api` with the CORS layer; everything else
//! falls through to static file serving.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_upload = state.config.storage.max_upload_size_bytes;

    let api_routes = Router::new()
        .merge(upload_routes())
        .merge(render_routes())
        .merge(video_routes())
        .merge(library_routes())
        .merge(health_routes())
        .layer(middleware::cors::build_cors_layer(&state.config.server.cors));

    Router::new()
        .nest("/api", api_routes)
        .merge(static_routes())
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(middleware::compression::build_compression_layer())
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Client uploads and library selection
fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(handlers::upload::upload_file))
        .route(
            "/upload-minecraft-item",
            post(handlers::upload::upload_library_asset),
        )
}

/// Descriptor generation and rendering
fn render_routes() -> Router<AppState> {
    Router::new().route("/generate", post(handlers::generate::generate_animation))
}

/// Rendered video download and preview
fn video_routes() -> Router<AppState> {
    Router::new()
        .route("/download/{file_id}", get(handlers::video::download_video))
        .route("/preview/{file_id}", get(handlers::video::preview_video))
}

/// Read-only asset library
fn library_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(handlers::library::list_items))
        .route("/items/{filename}", get(handlers::library::serve_item))
        .route("/blocks", get(handlers::library::list_blocks))
        .route("/blocks/{filename}", get(handlers::library::serve_block))
        .route("/minecraft", get(handlers::library::list_all))
}

/// Liveness
fn health_routes() -> Router<AppState> {
    Router::new().route("/status", get(handlers::health::status))
}

/// Index and static files
fn static_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::static_files::index))
        .route("/{*path}", get(handlers::static_files::serve))
}
