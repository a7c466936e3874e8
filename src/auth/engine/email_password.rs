//! Email and password sign-up / sign-in

use axum::{http::StatusCode, response::Response};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::password::{hash_password, verify_password};
use super::request::{json_response, parse_json, AuthRequest};
use super::AuthEngine;
use crate::auth::error::{AuthError, AuthResult};
use crate::common::{looks_like_email, safe_email_log, ValidationResult, Validator};
use crate::db::schema::User;

// ============================================================================
// REQUEST / RESPONSE MODELS
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub image: Option<String>,
    #[serde(rename = "callbackURL")]
    pub callback_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
    pub remember_me: Option<bool>,
    #[serde(rename = "callbackURL")]
    pub callback_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignUpResponse {
    pub token: Option<String>,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub redirect: bool,
    pub token: String,
    pub url: Option<String>,
    pub user: User,
}

// ============================================================================
// VALIDATORS
// ============================================================================

pub struct SignUpValidator;

impl Validator<SignUpRequest> for SignUpValidator {
    fn validate(&self, data: &SignUpRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.name.trim().is_empty() {
            result.add_error("name", "Name is required");
        } else if data.name.len() > 255 {
            result.add_error("name", "Name must be less than 255 characters");
        }

        if !looks_like_email(&data.email) {
            result.add_error("email", "Invalid email address");
        }

        if data.password.is_empty() {
            result.add_error("password", "Password is required");
        }

        result
    }
}

pub struct SignInValidator;

impl Validator<SignInRequest> for SignInValidator {
    fn validate(&self, data: &SignInRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if !looks_like_email(&data.email) {
            result.add_error("email", "Invalid email address");
        }

        if data.password.is_empty() {
            result.add_error("password", "Password is required");
        }

        result
    }
}

fn validation_error(result: ValidationResult) -> AuthError {
    let message = result
        .first_message()
        .unwrap_or("Invalid request body")
        .to_string();
    AuthError::bad_request("VALIDATION_ERROR", message)
}

fn user_already_exists(email: &str) -> AuthError {
    warn!(email = %safe_email_log(email), "Sign-up rejected: email already registered");
    AuthError::unprocessable(
        "USER_ALREADY_EXISTS",
        "User already exists. Use another email.",
    )
}

/// Emails are compared and stored trimmed and lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// ============================================================================
// HANDLERS
// ============================================================================

/// POST /sign-up/email
///
/// # Request Body
/// ```json
/// { "name": "Jane", "email": "jane@example.com", "password": "hunter22" }
/// ```
///
/// # Response
/// `{ "token": "...", "user": { ... } }` plus the session cookie
pub async fn sign_up(engine: &AuthEngine, req: &AuthRequest) -> AuthResult<Response> {
    let body: SignUpRequest = parse_json(req)?;
    SignUpValidator
        .validate(&body)
        .into_result()
        .map_err(validation_error)?;
    check_password_length(engine, &body.password)?;

    let email = normalize_email(&body.email);
    if engine.store.find_user_by_email(&email).await?.is_some() {
        return Err(user_already_exists(&email));
    }

    let password_hash = hash_password(&body.password).await?;
    let user = engine
        .store
        .create_credential_user(
            body.name.trim(),
            &email,
            body.image.as_deref(),
            &password_hash,
            Utc::now().naive_utc(),
        )
        .await?
        .ok_or_else(|| user_already_exists(&email))?;

    let session = engine.sessions.create_session(&user, &req.headers).await?;
    let cookie = engine.sessions.session_cookie(&session.token, true);

    info!(user_id = %user.id, email = %safe_email_log(&user.email), "👤 User signed up");

    json_response(
        StatusCode::OK,
        &SignUpResponse {
            token: Some(session.token),
            user,
        },
        vec![cookie],
    )
}

/// POST /sign-in/email
///
/// # Request Body
/// ```json
/// { "email": "jane@example.com", "password": "hunter22", "rememberMe": true }
/// ```
///
/// # Response
/// `{ "redirect": false, "token": "...", "url": null, "user": { ... } }` plus
/// the session cookie
pub async fn sign_in(engine: &AuthEngine, req: &AuthRequest) -> AuthResult<Response> {
    let body: SignInRequest = parse_json(req)?;
    SignInValidator
        .validate(&body)
        .into_result()
        .map_err(validation_error)?;

    let email = normalize_email(&body.email);
    let user = authenticate(engine, &email, &body.password).await?;

    let session = engine.sessions.create_session(&user, &req.headers).await?;
    let remember = body.remember_me.unwrap_or(true);
    let cookie = engine.sessions.session_cookie(&session.token, remember);

    info!(user_id = %user.id, email = %safe_email_log(&user.email), "🔐 User signed in");

    json_response(
        StatusCode::OK,
        &SignInResponse {
            redirect: false,
            token: session.token,
            url: None,
            user,
        },
        vec![cookie],
    )
}

/// Same error for unknown email and wrong password
async fn authenticate(engine: &AuthEngine, email: &str, password: &str) -> AuthResult<User> {
    let invalid = || AuthError::unauthorized("INVALID_EMAIL_OR_PASSWORD", "Invalid email or password");

    let Some(user) = engine.store.find_user_by_email(email).await? else {
        warn!(email = %safe_email_log(email), "Sign-in failed: unknown email");
        // Spend comparable time so unknown emails are not distinguishable
        let _ = hash_password(password).await;
        return Err(invalid());
    };

    let stored_hash = engine
        .store
        .find_credential_account(&user.id)
        .await?
        .and_then(|account| account.password);

    let Some(stored_hash) = stored_hash else {
        warn!(user_id = %user.id, "Sign-in failed: no credential account");
        return Err(invalid());
    };

    if !verify_password(password, &stored_hash).await? {
        warn!(user_id = %user.id, "Sign-in failed: wrong password");
        return Err(invalid());
    }

    Ok(user)
}

fn check_password_length(engine: &AuthEngine, password: &str) -> AuthResult<()> {
    let config = &engine.config;
    if password.chars().count() < config.password_min_length {
        return Err(AuthError::bad_request(
            "PASSWORD_TOO_SHORT",
            format!(
                "Password must be at least {} characters long",
                config.password_min_length
            ),
        ));
    }
    if password.chars().count() > config.password_max_length {
        return Err(AuthError::bad_request(
            "PASSWORD_TOO_LONG",
            format!(
                "Password must be at most {} characters long",
                config.password_max_length
            ),
        ));
    }
    Ok(())
}
