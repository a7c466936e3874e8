// src/logging_middleware.rs
//! Middleware for logging request and response bodies at debug level
//!
//! Bodies are only buffered when debug logging is enabled and the request
//! body is known to fit the logging limit; otherwise the request streams
//! through untouched. Bytes are passed on exactly as read, and any `password`
//! field is masked in the logged copy.

use axum::body::{to_bytes, Body, Bytes, HttpBody};
use axum::{extract::Request, middleware::Next, response::Response};
use serde_json::Value;
use tracing::{debug, Level};

use crate::common::ApiError;

/// Largest body the middleware will buffer for logging
const MAX_LOGGED_BODY: usize = 1024 * 1024;

const REDACTED: &str = "[REDACTED]";

/// Middleware to log request and response bodies in debug mode
pub async fn log_request_response(request: Request, next: Next) -> Result<Response, ApiError> {
    if !tracing::enabled!(Level::DEBUG) || !fits_log_limit(request.body()) {
        return Ok(next.run(request).await);
    }

    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, MAX_LOGGED_BODY)
        .await
        .map_err(|e| ApiError::InternalServer(format!("failed to read request body: {}", e)))?;

    if let Some(body) = printable_body(&bytes) {
        debug!(method = %parts.method, uri = %parts.uri, request_body = %body, "📥 Request");
    }

    let response = next.run(Request::from_parts(parts, Body::from(bytes))).await;

    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|e| ApiError::InternalServer(format!("failed to read response body: {}", e)))?;

    if let Some(body) = printable_body(&bytes) {
        debug!(status = %parts.status, response_body = %body, "📤 Response");
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}

/// Oversized or unknown-length bodies are left for the handler to judge
fn fits_log_limit(body: &Body) -> bool {
    body.size_hint()
        .upper()
        .is_some_and(|len| len <= MAX_LOGGED_BODY as u64)
}

/// Loggable rendition of a body: pretty JSON with secrets masked, or the raw
/// text. Empty and non-UTF-8 bodies are not logged.
fn printable_body(bytes: &Bytes) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }
    let text = std::str::from_utf8(bytes).ok()?;

    match serde_json::from_str::<Value>(text) {
        Ok(mut json) => {
            redact_secrets(&mut json);
            Some(serde_json::to_string_pretty(&json).unwrap_or_else(|_| text.to_string()))
        }
        Err(_) => Some(text.to_string()),
    }
}

fn redact_secrets(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if key.eq_ignore_ascii_case("password") {
                    *field = Value::String(REDACTED.to_string());
                } else {
                    redact_secrets(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_secrets),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, middleware, routing::post, Router};
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    #[test]
    fn test_redacts_nested_passwords() {
        let mut value = json!({
            "email": "jane@example.com",
            "password": "hunter22",
            "nested": { "Password": "x", "items": [{ "password": "y" }] }
        });
        redact_secrets(&mut value);

        assert_eq!(value["email"], "jane@example.com");
        assert_eq!(value["password"], REDACTED);
        assert_eq!(value["nested"]["Password"], REDACTED);
        assert_eq!(value["nested"]["items"][0]["password"], REDACTED);
    }

    #[test]
    fn test_printable_body() {
        assert_eq!(printable_body(&Bytes::new()), None);
        assert_eq!(printable_body(&Bytes::from_static(&[0xff, 0xfe])), None);
        assert_eq!(
            printable_body(&Bytes::from_static(b"plain text")).as_deref(),
            Some("plain text")
        );

        let logged = printable_body(&Bytes::from_static(br#"{"password":"hunter22"}"#)).unwrap();
        assert!(!logged.contains("hunter22"));
    }

    #[test]
    fn test_fits_log_limit() {
        assert!(fits_log_limit(&Body::empty()));
        assert!(fits_log_limit(&Body::from(vec![0u8; MAX_LOGGED_BODY])));
        assert!(!fits_log_limit(&Body::from(vec![0u8; MAX_LOGGED_BODY + 1])));
    }

    #[tokio::test]
    async fn test_oversized_body_reaches_handler_with_debug_logging() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let app = Router::new()
            .route("/len", post(|body: Bytes| async move { body.len().to_string() }))
            .layer(middleware::from_fn(log_request_response));

        let size = MAX_LOGGED_BODY + MAX_LOGGED_BODY / 2;
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/len")
                    .body(Body::from(vec![b'a'; size]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], size.to_string().as_bytes());
    }

    #[tokio::test]
    async fn test_bodies_pass_through_unchanged() {
        let app = Router::new()
            .route("/echo", post(|body: Bytes| async move { body }))
            .layer(middleware::from_fn(log_request_response));

        let payload = r#"{"email":"jane@example.com","password":"hunter22"}"#;
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/echo")
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], payload.as_bytes());
    }
}
