// src/auth_client.rs
//! Client for the backend's auth routes
//!
//! The frontend renders on the server, so the browser's cookies never reach
//! the backend directly. Every call takes the browser's `Cookie` header to
//! pass along and hands back the backend's `Set-Cookie` headers so the
//! caller can return them to the browser.

use reqwest::{header, Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum AuthClientError {
    /// The backend answered with a non-success status. `message` is the
    /// backend's own and may be empty.
    #[error("{message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: String,
    pub user_id: String,
    pub expires_at: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SessionData {
    pub session: SessionInfo,
    pub user: SessionUser,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInEmail {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remember_me: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUpEmail {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignInData {
    pub token: String,
    pub user: SessionUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpData {
    pub token: Option<String>,
    pub user: SessionUser,
}

#[derive(Debug, Clone, Deserialize)]
struct SuccessBody {
    success: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    code: String,
    message: String,
}

/// A decoded response plus the cookies to hand back to the browser
#[derive(Debug, Clone)]
pub struct Relayed<T> {
    pub data: T,
    pub set_cookies: Vec<String>,
}

// ============================================================================
// CLIENT
// ============================================================================

#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    /// `base_url` is the auth route prefix, e.g. `http://localhost:3001/api/v1/auth`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn sign_in_email(
        &self,
        body: &SignInEmail,
        cookie: Option<&str>,
    ) -> Result<Relayed<SignInData>, AuthClientError> {
        let request = self.client.post(self.url("/sign-in/email")).json(body);
        self.send(request, cookie).await
    }

    pub async fn sign_up_email(
        &self,
        body: &SignUpEmail,
        cookie: Option<&str>,
    ) -> Result<Relayed<SignUpData>, AuthClientError> {
        let request = self.client.post(self.url("/sign-up/email")).json(body);
        self.send(request, cookie).await
    }

    /// Returns whether the backend reported success
    pub async fn sign_out(&self, cookie: Option<&str>) -> Result<Relayed<bool>, AuthClientError> {
        let request = self.client.post(self.url("/sign-out"));
        let relayed: Relayed<SuccessBody> = self.send(request, cookie).await?;
        Ok(Relayed {
            data: relayed.data.success,
            set_cookies: relayed.set_cookies,
        })
    }

    /// `None` when the browser has no active session
    pub async fn get_session(
        &self,
        cookie: Option<&str>,
    ) -> Result<Relayed<Option<SessionData>>, AuthClientError> {
        let request = self.client.get(self.url("/get-session"));
        self.send(request, cookie).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        cookie: Option<&str>,
    ) -> Result<Relayed<T>, AuthClientError> {
        let request = match cookie.filter(|c| !c.is_empty()) {
            Some(cookie) => request.header(header::COOKIE, cookie),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let set_cookies: Vec<String> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();

        if !status.is_success() {
            let body: ErrorBody = response.json().await.unwrap_or_default();
            debug!(status = status.as_u16(), code = %body.code, "Auth call rejected");
            return Err(AuthClientError::Api {
                status: status.as_u16(),
                code: body.code,
                message: body.message,
            });
        }

        Ok(Relayed {
            data: response.json().await?,
            set_cookies,
        })
    }
}
