//! Auth engine
//!
//! The `AuthHandler` implementation mounted under `/api/v1/auth`. It speaks
//! the JSON/cookie contract the frontend auth client expects and is the only
//! writer of the auth tables.

pub mod email_password;
pub mod password;
pub mod request;
pub mod session;
pub mod store;

use async_trait::async_trait;
use axum::{
    extract::Request,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};

use self::request::{json_response, AuthRequest};
use self::session::SessionManager;
use self::store::AuthStore;
use super::config::AuthConfig;
use super::error::{AuthError, AuthResult};
use super::handler::AuthHandler;
use crate::db::schema::{Session, User};

/// Body of `GET /get-session` when a session is active
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: Session,
    pub user: User,
}

#[derive(Debug, Serialize)]
struct SuccessResponse {
    success: bool,
}

#[derive(Debug, Serialize)]
struct OkResponse {
    ok: bool,
}

pub struct AuthEngine {
    pub(crate) config: Arc<AuthConfig>,
    pub(crate) store: AuthStore,
    pub(crate) sessions: SessionManager,
}

impl AuthEngine {
    pub fn new(config: AuthConfig, pool: PgPool) -> Self {
        let config = Arc::new(config);
        let store = AuthStore::new(pool);
        let sessions = SessionManager::new(config.clone(), store.clone());

        info!(
            base_url = %config.base_url,
            base_path = %config.base_path,
            trusted_origins = ?config.trusted_origins,
            trust_all_origins = config.trust_all_origins,
            "Auth engine initialized"
        );

        Self {
            config,
            store,
            sessions,
        }
    }

    async fn dispatch(&self, req: &AuthRequest) -> AuthResult<Response> {
        if req.method == Method::POST {
            self.check_origin(req)?;
        }

        let method = &req.method;
        match req.path.as_str() {
            "/ok" if method == Method::GET => {
                json_response(StatusCode::OK, &OkResponse { ok: true }, vec![])
            }
            "/sign-up/email" if method == Method::POST => email_password::sign_up(self, req).await,
            "/sign-in/email" if method == Method::POST => email_password::sign_in(self, req).await,
            "/sign-out" if method == Method::POST => self.sign_out(req).await,
            "/get-session" if method == Method::GET => self.get_session(req).await,
            path => Err(AuthError::not_found(format!(
                "No auth route for {} {}",
                method, path
            ))),
        }
    }

    /// Rejects state-changing requests from browsers on untrusted origins
    fn check_origin(&self, req: &AuthRequest) -> AuthResult<()> {
        let Some(origin) = req.header(header::ORIGIN.as_str()) else {
            return Ok(());
        };

        if self.config.is_trusted_origin(origin) {
            Ok(())
        } else {
            warn!(origin = %origin, path = %req.path, "Rejected request from untrusted origin");
            Err(AuthError::forbidden("INVALID_ORIGIN", "Invalid origin"))
        }
    }

    /// GET /get-session
    /// `{ session, user }` for an active session, JSON `null` otherwise
    async fn get_session(&self, req: &AuthRequest) -> AuthResult<Response> {
        match self.sessions.current_session(&req.headers).await? {
            Some((session, user)) => {
                json_response(StatusCode::OK, &SessionResponse { session, user }, vec![])
            }
            None => json_response(StatusCode::OK, &serde_json::Value::Null, vec![]),
        }
    }

    /// POST /sign-out
    /// Deletes the current session (if any) and clears the cookie
    async fn sign_out(&self, req: &AuthRequest) -> AuthResult<Response> {
        if self.sessions.revoke_current(&req.headers).await? {
            info!("👋 Session signed out");
        }

        json_response(
            StatusCode::OK,
            &SuccessResponse { success: true },
            vec![self.sessions.clear_cookie()],
        )
    }
}

#[async_trait]
impl AuthHandler for AuthEngine {
    async fn handle(&self, request: Request) -> Result<Response, AuthError> {
        let result = match AuthRequest::from_request(
            request,
            &self.config.base_path,
            self.config.body_limit,
        )
        .await
        {
            Ok(req) => self.dispatch(&req).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(response) => Ok(response),
            Err(e) if e.is_api() => Ok(e.into_response()),
            Err(e) => Err(e),
        }
    }
}
