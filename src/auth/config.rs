//! Auth configuration derived from `AppConfig`

use chrono::Duration;

use super::routes::AUTH_BASE_PATH;
use crate::config::AppConfig;

/// Name of the session cookie, before the `__Secure-` prefix
pub const SESSION_COOKIE_NAME: &str = "session_token";

/// Settings the auth engine is bound to
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Public origin of the backend, e.g. `https://api.example.com`
    pub base_url: String,
    /// Path prefix stripped from incoming request paths
    pub base_path: String,
    /// HMAC key for session cookies
    pub secret: String,
    /// Origins allowed to send state-changing requests
    pub trusted_origins: Vec<String>,
    /// Development mode: any origin is trusted
    pub trust_all_origins: bool,
    pub session_expires_in: Duration,
    /// Sessions older than this have their expiry slid forward on use
    pub session_update_age: Duration,
    pub password_min_length: usize,
    pub password_max_length: usize,
    /// Maximum accepted request body, in bytes
    pub body_limit: usize,
}

impl AuthConfig {
    pub fn new(base_url: impl Into<String>, secret: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let trusted_origins = origin_of(&base_url).into_iter().collect();

        Self {
            base_url,
            base_path: AUTH_BASE_PATH.to_string(),
            secret: secret.into(),
            trusted_origins,
            trust_all_origins: false,
            session_expires_in: Duration::days(7),
            session_update_age: Duration::days(1),
            password_min_length: 8,
            password_max_length: 128,
            body_limit: 1024 * 1024,
        }
    }

    /// Binds the engine to the backend's environment: base URL, secret and
    /// the same origin allow-list CORS uses.
    pub fn from_app_config(config: &AppConfig) -> Self {
        let mut auth = Self::new(&config.auth_base_url, &config.auth_secret);
        auth.trusted_origins
            .extend(config.allowed_origins.iter().cloned());
        auth.trust_all_origins = !config.environment.is_production();
        auth
    }

    /// Secure cookies only make sense when the backend is served over https
    pub fn cookie_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    pub fn cookie_name(&self) -> String {
        if self.cookie_secure() {
            format!("__Secure-{}", SESSION_COOKIE_NAME)
        } else {
            SESSION_COOKIE_NAME.to_string()
        }
    }

    pub fn is_trusted_origin(&self, origin: &str) -> bool {
        if self.trust_all_origins {
            return true;
        }
        let origin = origin.trim_end_matches('/');
        self.trusted_origins.iter().any(|o| o == origin)
    }
}

/// `scheme://host[:port]` of a URL, without path
pub fn origin_of(url: &str) -> Option<String> {
    let (scheme, rest) = url.split_once("://")?;
    let authority = rest.split(|c: char| matches!(c, '/' | '?' | '#')).next()?;
    if scheme.is_empty() || authority.is_empty() {
        return None;
    }
    Some(format!("{}://{}", scheme, authority))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_of() {
        assert_eq!(
            origin_of("https://api.example.com/api/v1").as_deref(),
            Some("https://api.example.com")
        );
        assert_eq!(
            origin_of("http://localhost:3001").as_deref(),
            Some("http://localhost:3001")
        );
        assert_eq!(origin_of("not a url"), None);
    }

    #[test]
    fn test_base_url_origin_is_trusted() {
        let config = AuthConfig::new("https://api.example.com/", "secret");
        assert!(config.is_trusted_origin("https://api.example.com"));
        assert!(!config.is_trusted_origin("https://evil.example.com"));
    }

    #[test]
    fn test_trust_all_origins() {
        let mut config = AuthConfig::new("http://localhost:3001", "secret");
        config.trust_all_origins = true;
        assert!(config.is_trusted_origin("http://anything.test"));
    }

    #[test]
    fn test_cookie_name_follows_scheme() {
        assert_eq!(
            AuthConfig::new("http://localhost:3001", "s").cookie_name(),
            "session_token"
        );
        assert_eq!(
            AuthConfig::new("https://api.example.com", "s").cookie_name(),
            "__Secure-session_token"
        );
    }
}
