//! Request decoding and response building for the auth engine

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::Request,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::Response,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::auth::error::{AuthError, AuthResult};

/// A fully-buffered auth request with its path relative to the base path
#[derive(Debug)]
pub struct AuthRequest {
    pub method: Method,
    /// e.g. `/sign-in/email`
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl AuthRequest {
    /// Buffers `request`, rejecting bodies larger than `limit` and paths
    /// outside `base_path`.
    pub async fn from_request(
        request: Request,
        base_path: &str,
        limit: usize,
    ) -> AuthResult<Self> {
        let (parts, body) = request.into_parts();

        let path = parts
            .uri
            .path()
            .strip_prefix(base_path)
            .map(|rest| {
                let rest = rest.trim_end_matches('/');
                if rest.is_empty() {
                    "/".to_string()
                } else {
                    rest.to_string()
                }
            })
            .ok_or_else(|| AuthError::not_found(format!("No auth route for {}", parts.uri.path())))?;

        let body = to_bytes(body, limit).await.map_err(|_| {
            AuthError::api(
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                "Request body is too large",
            )
        })?;

        Ok(Self {
            method: parts.method,
            path,
            headers: parts.headers,
            body,
        })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Decode the JSON body; an empty or malformed body is a 400
pub fn parse_json<T: DeserializeOwned>(req: &AuthRequest) -> AuthResult<T> {
    if req.body.is_empty() {
        return Err(AuthError::bad_request(
            "VALIDATION_ERROR",
            "Request body is required",
        ));
    }
    serde_json::from_slice(&req.body)
        .map_err(|e| AuthError::bad_request("VALIDATION_ERROR", format!("Invalid request body: {}", e)))
}

/// JSON response with any number of `Set-Cookie` headers
pub fn json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
    cookies: Vec<String>,
) -> AuthResult<Response> {
    let bytes = serde_json::to_vec(body).map_err(|e| AuthError::Response(e.to_string()))?;

    let mut builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json");

    for cookie in cookies {
        let value =
            HeaderValue::from_str(&cookie).map_err(|e| AuthError::Response(e.to_string()))?;
        builder = builder.header(header::SET_COOKIE, value);
    }

    builder
        .body(Body::from(bytes))
        .map_err(|e| AuthError::Response(e.to_string()))
}
