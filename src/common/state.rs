// Application state shared by every backend route

use std::sync::Arc;

use crate::auth::AuthHandler;
use crate::config::AppConfig;

/// Configuration and the injected auth handler
///
/// Built once in `main` and consumed by [`crate::app::app`]. The database pool
/// lives inside the auth handler, its only user.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub auth: Arc<dyn AuthHandler>,
}
