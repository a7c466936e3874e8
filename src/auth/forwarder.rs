//! Catch-all forwarder for the auth namespace

use axum::{
    extract::{Extension, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, error};

use super::handler::AuthHandler;

/// ANY /api/v1/auth/*
/// Hands the request to the injected auth handler without inspecting or
/// rewriting it, and returns whatever the handler produced.
///
/// A handler failure becomes a bare `500 Internal Server Error`; no error
/// body is invented here.
pub async fn forward(
    Extension(handler): Extension<Arc<dyn AuthHandler>>,
    request: Request,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    debug!(method = %method, uri = %uri, "Forwarding auth request");

    match handler.handle(request).await {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, method = %method, uri = %uri, "Auth handler failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
