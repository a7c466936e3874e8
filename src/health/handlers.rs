//! Health handlers

use axum::Json;
use chrono::{SecondsFormat, Utc};

use super::models::{HealthResponse, HEALTH_MESSAGE};

/// GET /api/v1
/// Returns a static greeting plus the server timestamp
///
/// # Response
/// ```json
/// {
///   "message": "Hello from the Backend",
///   "time": "2024-01-01T00:00:00.000Z"
/// }
/// ```
pub async fn ping() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: HEALTH_MESSAGE.to_string(),
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
