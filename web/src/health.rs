// src/health.rs
//! Backend health check
//!
//! One GET per call, no retries. Every outcome is classified into an
//! [`ApiHealth`]; failures are logged and never propagated.

use reqwest::{header, Client};
use serde::Serialize;
use std::time::Duration;
use tracing::warn;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_MESSAGE: &str = "Connected";
const ERROR_MESSAGE: &str = "API returned error";
const OFFLINE_MESSAGE: &str = "Backend service unavailable";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Online,
    Offline,
    Error,
}

impl ApiStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiStatus::Online => "online",
            ApiStatus::Offline => "offline",
            ApiStatus::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    pub status: ApiStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub message: String,
}

impl ApiHealth {
    fn online(status_code: u16, message: String) -> Self {
        Self {
            status: ApiStatus::Online,
            status_code: Some(status_code),
            message,
        }
    }

    fn error(status_code: u16) -> Self {
        Self {
            status: ApiStatus::Error,
            status_code: Some(status_code),
            message: ERROR_MESSAGE.to_string(),
        }
    }

    fn offline() -> Self {
        Self {
            status: ApiStatus::Offline,
            status_code: None,
            message: OFFLINE_MESSAGE.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct HealthClient {
    client: Client,
    url: String,
}

impl HealthClient {
    pub fn new(url: impl Into<String>) -> Result<Self, reqwest::Error> {
        Self::with_timeout(url, HEALTH_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            url: url.into(),
        })
    }

    pub async fn check(&self) -> ApiHealth {
        let response = match self
            .client
            .get(&self.url)
            .header(header::CACHE_CONTROL, "no-store")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %self.url, error = %e, "API health check failed");
                return ApiHealth::offline();
            }
        };

        let status = response.status();
        if !status.is_success() {
            return ApiHealth::error(status.as_u16());
        }

        // A success body that is not JSON is not our API
        let message = match response.json::<serde_json::Value>().await {
            Ok(body) => body
                .get("message")
                .and_then(|m| m.as_str())
                .filter(|m| !m.is_empty())
                .map(str::to_string),
            Err(e) => {
                warn!(url = %self.url, error = %e, "Health response was not JSON");
                return ApiHealth::offline();
            }
        };

        ApiHealth::online(
            status.as_u16(),
            message.unwrap_or_else(|| DEFAULT_MESSAGE.to_string()),
        )
    }
}
