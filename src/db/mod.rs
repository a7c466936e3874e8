// src/db/mod.rs
//! Database connection provider
//!
//! Builds the process-wide PostgreSQL pool from [`DatabaseConfig`]. The pool
//! is created once at startup and handed to consumers explicitly.

pub mod schema;
pub mod seed;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;

/// TLS mode for a configuration
///
/// `Require` encrypts the connection without validating the server
/// certificate, so self-signed certificates are accepted in production.
pub fn ssl_mode(config: &DatabaseConfig) -> PgSslMode {
    if config.ssl {
        PgSslMode::Require
    } else {
        PgSslMode::Disable
    }
}

pub fn connect_options(config: &DatabaseConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.database)
        .ssl_mode(ssl_mode(config))
}

/// Opens the shared pool. Connection errors propagate; there is no retry.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        ssl = config.ssl,
        "Connecting to PostgreSQL"
    );

    PgPoolOptions::new()
        .connect_with(connect_options(config))
        .await
}
