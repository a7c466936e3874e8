//! Auth error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors raised while handling an auth request
///
/// `Api` errors are part of the auth contract and become JSON responses.
/// Every other variant is an internal failure that escapes the handler and
/// surfaces as a plain 500 from the forwarder.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{message}")]
    Api {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error("failed to build response: {0}")]
    Response(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    pub fn api(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        AuthError::Api {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::api(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        Self::api(StatusCode::UNAUTHORIZED, code, message)
    }

    pub fn forbidden(code: &'static str, message: impl Into<String>) -> Self {
        Self::api(StatusCode::FORBIDDEN, code, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::api(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn unprocessable(code: &'static str, message: impl Into<String>) -> Self {
        Self::api(StatusCode::UNPROCESSABLE_ENTITY, code, message)
    }

    pub fn is_api(&self) -> bool {
        matches!(self, AuthError::Api { .. })
    }
}

/// JSON body for contract errors
#[derive(Serialize, Debug)]
pub struct AuthErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Api {
                status,
                code,
                message,
            } => (
                status,
                Json(AuthErrorBody {
                    code: code.to_string(),
                    message,
                }),
            )
                .into_response(),
            _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}
