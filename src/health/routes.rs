//! Health routes

use axum::{routing::get, Router};

use super::handlers;

/// Creates and returns the health router
///
/// # Routes
/// - `GET /api/v1` - Greeting and server time
/// - `GET /api/v1/` - Same, with trailing slash
pub fn health_routes() -> Router {
    Router::new()
        .route("/api/v1", get(handlers::ping))
        .route("/api/v1/", get(handlers::ping))
}
