// Common module - shared types and utilities across all modules

pub mod error;
pub mod helpers;
pub mod id_generator;
pub mod state;
pub mod validation;

// Re-export commonly used types for convenience
pub use error::ApiError;
pub use helpers::{safe_email_log, safe_token_log};
pub use id_generator::{generate_id, generate_session_token};
pub use state::AppState;
pub use validation::{looks_like_email, ValidationError, ValidationResult, Validator};
