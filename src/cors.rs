// src/cors.rs
//! CORS policy
//!
//! Development reflects whatever origin, method and headers the browser
//! asks for (the credential-compatible form of `*`). Production allows
//! exactly the `ALLOWED_ORIGINS` list; an empty list admits no cross-origin
//! caller. Credentials are allowed in both.

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::AppConfig;

pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    if !config.environment.is_production() {
        return CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparseable origin in ALLOWED_ORIGINS");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, DatabaseConfig, Environment};
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    fn config(environment: Environment, allowed_origins: &[&str]) -> AppConfig {
        AppConfig {
            environment,
            api_port: 3001,
            database: DatabaseConfig {
                host: "localhost".to_string(),
                port: 5432,
                user: "root".to_string(),
                password: "root".to_string(),
                database: "test".to_string(),
                ssl: environment.is_production(),
            },
            allowed_origins: allowed_origins.iter().map(|s| s.to_string()).collect(),
            auth_secret: "x".repeat(32),
            auth_base_url: "http://localhost:3001".to_string(),
        }
    }

    async fn preflight(config: &AppConfig, origin: &str) -> Option<String> {
        let app = Router::new()
            .route("/api/v1", get(|| async { "ok" }))
            .layer(cors_layer(config));

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/v1")
                    .header(header::ORIGIN, origin)
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_development_reflects_any_origin() {
        let config = config(Environment::Development, &[]);
        assert_eq!(
            preflight(&config, "http://random.test:1234").await.as_deref(),
            Some("http://random.test:1234")
        );
    }

    #[tokio::test]
    async fn test_production_uses_allow_list() {
        let config = config(Environment::Production, &["https://app.example.com"]);
        assert_eq!(
            preflight(&config, "https://app.example.com").await.as_deref(),
            Some("https://app.example.com")
        );
        assert_eq!(preflight(&config, "https://evil.example.com").await, None);
    }

    #[tokio::test]
    async fn test_production_with_empty_list_blocks_everything() {
        let config = config(Environment::Production, &[]);
        assert_eq!(preflight(&config, "https://app.example.com").await, None);
    }
}
