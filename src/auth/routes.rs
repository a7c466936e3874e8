//! Authentication routes

use axum::{routing::any, Extension, Router};
use std::sync::Arc;

use super::{forwarder, handler::AuthHandler};

/// Path prefix owned by the auth handler
pub const AUTH_BASE_PATH: &str = "/api/v1/auth";

/// Creates and returns the authentication router
///
/// # Routes
/// - `ANY /api/v1/auth/*` - Forwarded verbatim to `handler`
pub fn auth_routes(handler: Arc<dyn AuthHandler>) -> Router {
    Router::new()
        .route("/api/v1/auth/*path", any(forwarder::forward))
        .layer(Extension(handler))
}
