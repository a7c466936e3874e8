//! Session tokens, signed cookies and session lookup

use axum::http::{header, HeaderMap};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{NaiveDateTime, Utc};
use cookie::time::{Duration as CookieDuration, OffsetDateTime};
use cookie::{Cookie, CookieBuilder, SameSite};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;
use tracing::debug;

use super::store::{AuthStore, NewSession};
use crate::auth::config::AuthConfig;
use crate::auth::error::AuthResult;
use crate::common::{generate_session_token, safe_token_log};
use crate::db::schema::{Session, User};

type HmacSha256 = Hmac<Sha256>;

/// Session manager handles session creation, validation and cookies
#[derive(Clone)]
pub struct SessionManager {
    config: Arc<AuthConfig>,
    store: AuthStore,
}

impl SessionManager {
    pub fn new(config: Arc<AuthConfig>, store: AuthStore) -> Self {
        Self { config, store }
    }

    /// Create a new session for `user`, recording the caller's IP and agent
    pub async fn create_session(&self, user: &User, headers: &HeaderMap) -> AuthResult<Session> {
        let now = Utc::now().naive_utc();
        let session = self
            .store
            .create_session(
                NewSession {
                    user_id: user.id.clone(),
                    token: generate_session_token(),
                    expires_at: now + self.config.session_expires_in,
                    ip_address: client_ip(headers),
                    user_agent: header_value(headers, header::USER_AGENT.as_str()),
                },
                now,
            )
            .await?;

        debug!(user_id = %user.id, token = %safe_token_log(&session.token), "Session created");
        Ok(session)
    }

    /// Resolve the session carried by a request, if any
    ///
    /// Expired sessions count as absent but are left in the table.
    pub async fn current_session(&self, headers: &HeaderMap) -> AuthResult<Option<(Session, User)>> {
        let Some(token) = self.extract_session_token(headers) else {
            return Ok(None);
        };

        let Some(mut session) = self.store.find_session_by_token(&token).await? else {
            return Ok(None);
        };

        let now = Utc::now().naive_utc();
        if session.expires_at <= now {
            debug!(token = %safe_token_log(&token), "Session expired");
            return Ok(None);
        }

        if self.needs_refresh(&session, now) {
            if let Some(refreshed) = self
                .store
                .extend_session(&token, now + self.config.session_expires_in, now)
                .await?
            {
                session = refreshed;
            }
        }

        let Some(user) = self.store.find_user_by_id(&session.user_id).await? else {
            return Ok(None);
        };

        Ok(Some((session, user)))
    }

    /// Delete the session carried by a request. Returns whether one existed.
    pub async fn revoke_current(&self, headers: &HeaderMap) -> AuthResult<bool> {
        match self.extract_session_token(headers) {
            Some(token) => Ok(self.store.delete_session(&token).await? > 0),
            None => Ok(false),
        }
    }

    /// A session is refreshed once it is older than the update age
    fn needs_refresh(&self, session: &Session, now: NaiveDateTime) -> bool {
        let issued_at = session.expires_at - self.config.session_expires_in;
        issued_at + self.config.session_update_age <= now
    }

    /// Extract the session token from a request.
    ///
    /// Tries a Bearer token from the Authorization header first (unsigned),
    /// then the session cookie (HMAC-verified).
    pub fn extract_session_token(&self, headers: &HeaderMap) -> Option<String> {
        if let Some(auth) = header_value(headers, header::AUTHORIZATION.as_str()) {
            if let Some(token) = auth.strip_prefix("Bearer ") {
                let token = token.trim();
                if !token.is_empty() {
                    return Some(token.to_string());
                }
            }
        }

        let cookie_name = self.config.cookie_name();
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, value)| *name == cookie_name && !value.is_empty())
            .and_then(|(_, value)| self.verify_signed_token(value))
    }

    /// `token.signature`, signature = base64url(HMAC-SHA256(secret, token))
    pub fn sign_token(&self, token: &str) -> String {
        format!("{}.{}", token, compute_signature(token, &self.config.secret))
    }

    /// Verify a signed cookie value and return the raw token
    pub fn verify_signed_token(&self, signed: &str) -> Option<String> {
        let (token, signature) = signed.rsplit_once('.')?;
        if token.is_empty() || signature.is_empty() {
            return None;
        }

        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;
        let mut mac = HmacSha256::new_from_slice(self.config.secret.as_bytes()).ok()?;
        mac.update(token.as_bytes());
        // verify_slice compares in constant time
        mac.verify_slice(&signature).ok()?;

        Some(token.to_string())
    }

    /// `Set-Cookie` value carrying a signed session token
    ///
    /// With `remember` unset the cookie has no lifetime and dies with the
    /// browser session; the session row still expires normally.
    pub fn session_cookie(&self, token: &str, remember: bool) -> String {
        let signed = self.sign_token(token);
        let mut cookie = self.cookie_builder(signed);
        if remember {
            cookie = cookie.max_age(CookieDuration::seconds(
                self.config.session_expires_in.num_seconds(),
            ));
        }
        cookie.build().to_string()
    }

    /// `Set-Cookie` value that removes the session cookie
    pub fn clear_cookie(&self) -> String {
        self.cookie_builder(String::new())
            .max_age(CookieDuration::ZERO)
            .expires(OffsetDateTime::UNIX_EPOCH)
            .build()
            .to_string()
    }

    fn cookie_builder(&self, value: String) -> CookieBuilder<'static> {
        Cookie::build((self.config.cookie_name(), value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.config.cookie_secure())
    }
}

fn compute_signature(token: &str, secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any size");
    mac.update(token.as_bytes());
    URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Client address: first hop of `x-forwarded-for`, else `x-real-ip`
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    header_value(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string()))
        .filter(|ip| !ip.is_empty())
        .or_else(|| header_value(headers, "x-real-ip"))
}
