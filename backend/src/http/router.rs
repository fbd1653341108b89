//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let traffic = Router::new()
        .route("/flow", get(handlers::get_flow))
        .route("/incidents", get(handlers::get_incidents))
        .route("/summary", get(handlers::get_summary))
        .route("/dashboard", get(handlers::get_dashboard));

    let api = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/geocode", get(handlers::geocode))
        .nest("/traffic", traffic);

    Router::new()
        .nest("/api", api)
        .fallback(handlers::not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
