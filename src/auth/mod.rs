//! # Auth Module
//!
//! This module owns everything under `/api/v1/auth`:
//! - The `AuthHandler` capability the rest of the backend talks to
//! - The catch-all forwarder route that hands requests to it untouched
//! - `AuthEngine`, the handler implementation backed by the auth tables

pub mod config;
pub mod engine;
pub mod error;
pub mod forwarder;
pub mod handler;
pub mod routes;


pub use config::AuthConfig;
pub use engine::AuthEngine;
pub use error::AuthError;
pub use handler::AuthHandler;
pub use routes::{auth_routes, AUTH_BASE_PATH};
