//! Health data models

use serde::{Deserialize, Serialize};

/// Greeting returned by the root endpoint
pub const HEALTH_MESSAGE: &str = "Hello from the Backend";

/// Body of `GET /api/v1`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HealthResponse {
    pub message: String,
    /// Server time, RFC 3339 UTC
    pub time: String,
}
