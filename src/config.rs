// src/config.rs
//! Environment-driven configuration
//!
//! Everything the backend needs from the process environment is read here,
//! once, at startup. Consumers receive an [`AppConfig`] by value or reference
//! and never touch `std::env` themselves.

use std::env;
use thiserror::Error;
use tracing::warn;

const DEFAULT_API_PORT: u16 = 3001;
const DEFAULT_POSTGRES_HOST: &str = "localhost";
const DEFAULT_POSTGRES_PORT: u16 = 5432;
const DEFAULT_POSTGRES_USER: &str = "root";
const DEFAULT_POSTGRES_PASSWORD: &str = "root";
const DEFAULT_POSTGRES_DB: &str = "the-perfect-boilerplate";
const DEVELOPMENT_AUTH_SECRET: &str = "development-only-secret-change-me-0123456789";
const MIN_AUTH_SECRET_LEN: usize = 32;

/// Configuration failures detected at startup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Deployment environment, derived from `NODE_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn from_node_env(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("production") => Environment::Production,
            Some("test") => Environment::Test,
            _ => Environment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }
}

/// PostgreSQL connection parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// TLS is used in production, with certificate validation relaxed
    pub ssl: bool,
}

impl DatabaseConfig {
    /// Backend rules: every key is required in production. Outside production
    /// missing keys fall back to local-development defaults, each one logged.
    pub fn from_lookup<F>(lookup: &F, environment: Environment) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let strict = environment.is_production();

        let host = string_or_default(lookup, "POSTGRES_HOST", DEFAULT_POSTGRES_HOST, strict)?;
        let port = match non_empty(lookup, "POSTGRES_PORT") {
            Some(raw) => parse_port("POSTGRES_PORT", &raw)?,
            None if strict => return Err(ConfigError::Missing("POSTGRES_PORT")),
            None => {
                warn!(key = "POSTGRES_PORT", default = DEFAULT_POSTGRES_PORT, "Using default configuration value");
                DEFAULT_POSTGRES_PORT
            }
        };
        let user = string_or_default(lookup, "POSTGRES_USER", DEFAULT_POSTGRES_USER, strict)?;
        let password =
            string_or_default(lookup, "POSTGRES_PASSWORD", DEFAULT_POSTGRES_PASSWORD, strict)?;
        let database = string_or_default(lookup, "POSTGRES_DB", DEFAULT_POSTGRES_DB, strict)?;

        Ok(Self {
            host,
            port,
            user,
            password,
            database,
            ssl: environment.is_production(),
        })
    }

    /// Seed-script rules: every key is required in every environment.
    pub fn require_from_lookup<F>(lookup: &F, environment: Environment) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| non_empty(lookup, key).ok_or(ConfigError::Missing(key));

        Ok(Self {
            host: required("POSTGRES_HOST")?,
            port: parse_port("POSTGRES_PORT", &required("POSTGRES_PORT")?)?,
            user: required("POSTGRES_USER")?,
            password: required("POSTGRES_PASSWORD")?,
            database: required("POSTGRES_DB")?,
            ssl: environment.is_production(),
        })
    }
}

/// Backend configuration, built once in `main`
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub api_port: u16,
    pub database: DatabaseConfig,
    /// Cross-origin allow-list, only consulted in production
    pub allowed_origins: Vec<String>,
    pub auth_secret: String,
    /// Public origin of this backend, e.g. `http://localhost:3001`
    pub auth_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key: &str| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::from_node_env(lookup("NODE_ENV").as_deref());

        let api_port = match non_empty(lookup, "API_PORT") {
            Some(raw) => parse_port("API_PORT", &raw)?,
            None => DEFAULT_API_PORT,
        };

        let database = DatabaseConfig::from_lookup(lookup, environment)?;

        let allowed_origins = parse_origins(&lookup("ALLOWED_ORIGINS").unwrap_or_default());
        if environment.is_production() && allowed_origins.is_empty() {
            warn!("ALLOWED_ORIGINS is empty in production; all cross-origin requests will be rejected");
        }

        let auth_secret = match non_empty(lookup, "AUTH_SECRET") {
            Some(secret) if secret.len() < MIN_AUTH_SECRET_LEN => {
                return Err(ConfigError::Invalid {
                    key: "AUTH_SECRET",
                    reason: format!("must be at least {} characters", MIN_AUTH_SECRET_LEN),
                })
            }
            Some(secret) => secret,
            None if environment.is_production() => return Err(ConfigError::Missing("AUTH_SECRET")),
            None => {
                warn!("AUTH_SECRET not set, using a development-only secret");
                DEVELOPMENT_AUTH_SECRET.to_string()
            }
        };

        let auth_base_url = non_empty(lookup, "AUTH_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://localhost:{}", api_port));

        Ok(Self {
            environment,
            api_port,
            database,
            allowed_origins,
            auth_secret,
            auth_base_url,
        })
    }
}

/// Splits a comma-separated origin list, trimming entries and dropping blanks
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn string_or_default<F>(
    lookup: &F,
    key: &'static str,
    default: &str,
    strict: bool,
) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup, key) {
        Some(value) => Ok(value),
        None if strict => Err(ConfigError::Missing(key)),
        None => {
            warn!(key = key, "Using default configuration value");
            Ok(default.to_string())
        }
    }
}

fn parse_port(key: &'static str, raw: &str) -> Result<u16, ConfigError> {
    raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}
