//! The capability the backend delegates `/api/v1/auth/*` to

use async_trait::async_trait;
use axum::{extract::Request, response::Response};

use super::error::AuthError;

/// Handles a complete auth request/response cycle
///
/// Implementations receive the request exactly as it arrived (full URI,
/// method, headers and body) and own every aspect of the response,
/// including `Set-Cookie` headers. An `Err` means the handler itself failed.
#[async_trait]
pub trait AuthHandler: Send + Sync {
    async fn handle(&self, request: Request) -> Result<Response, AuthError>;
}
