// src/config.rs
//! Frontend configuration, read once at startup

use std::env;
use thiserror::Error;

const DEFAULT_API_URL: &str = "http://localhost:3001";
const DEFAULT_PUBLIC_API_URL: &str = "http://localhost:3001/api/v1";
const DEFAULT_WEB_PORT: u16 = 3000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    /// Server-side target for the health check, e.g. `http://localhost:3001`
    pub api_url: String,
    /// Base of the backend's versioned API; auth routes live under `/auth`
    pub public_api_url: String,
    pub port: u16,
}

impl WebConfig {
    pub fn from_env() -> Result<Self, WebConfigError> {
        Self::from_lookup(&|key: &str| env::var(key).ok())
    }

    /// `NEXT_PUBLIC_API_URL` wins over `PUBLIC_API_URL` when both are set
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, WebConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = value("API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let public_api_url = value("NEXT_PUBLIC_API_URL")
            .or_else(|| value("PUBLIC_API_URL"))
            .unwrap_or_else(|| DEFAULT_PUBLIC_API_URL.to_string());

        let port = match value("WEB_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| WebConfigError::Invalid {
                key: "WEB_PORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_WEB_PORT,
        };

        Ok(Self {
            api_url: api_url.trim().trim_end_matches('/').to_string(),
            public_api_url: public_api_url.trim().trim_end_matches('/').to_string(),
            port,
        })
    }

    /// The backend's health endpoint
    pub fn health_url(&self) -> String {
        format!("{}/api/v1", self.api_url)
    }

    /// Prefix of the forwarded auth routes
    pub fn auth_url(&self) -> String {
        format!("{}/auth", self.public_api_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<WebConfig, WebConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        WebConfig::from_lookup(&|key: &str| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api_url, "http://localhost:3001");
        assert_eq!(config.health_url(), "http://localhost:3001/api/v1");
        assert_eq!(config.auth_url(), "http://localhost:3001/api/v1/auth");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_public_url_precedence() {
        let config = load(&[
            ("NEXT_PUBLIC_API_URL", "https://api.example.com/api/v1/"),
            ("PUBLIC_API_URL", "https://ignored.example.com/api/v1"),
        ])
        .unwrap();
        assert_eq!(config.auth_url(), "https://api.example.com/api/v1/auth");

        let config = load(&[("PUBLIC_API_URL", "https://other.example.com/api/v1")]).unwrap();
        assert_eq!(config.public_api_url, "https://other.example.com/api/v1");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = load(&[("API_URL", "http://backend:3001/")]).unwrap();
        assert_eq!(config.health_url(), "http://backend:3001/api/v1");
    }

    #[test]
    fn test_invalid_port() {
        assert!(matches!(
            load(&[("WEB_PORT", "eighty")]),
            Err(WebConfigError::Invalid { key: "WEB_PORT", .. })
        ));
    }
}
