//! # Health Module
//!
//! Liveness endpoint at the root of the API prefix. It has no dependencies
//! and no failure modes beyond the process being down.

pub mod handlers;
pub mod models;
pub mod routes;


pub use models::HealthResponse;
pub use routes::health_routes;
