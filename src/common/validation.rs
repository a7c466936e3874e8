// src/common/validation.rs
// Request validation types shared by the auth endpoints

/// A single failed check on one request field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.errors.push(ValidationError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    /// The first reported message, which is what clients display
    pub fn first_message(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }

    /// Converts into `Err` when any check failed
    pub fn into_result(self) -> Result<(), ValidationResult> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

pub trait Validator<T> {
    fn validate(&self, data: &T) -> ValidationResult;
}

/// Loose structural email check: one `@`, non-empty local part, dotted domain
pub fn looks_like_email(email: &str) -> bool {
    let email = email.trim();
    if email.len() > 254 || email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_result_collects_errors() {
        let mut result = ValidationResult::new();
        assert!(result.is_valid());

        result.add_error("email", "Invalid email address");
        result.add_error("password", "Password is required");

        assert!(!result.is_valid());
        assert_eq!(result.first_message(), Some("Invalid email address"));
        assert_eq!(result.into_result().unwrap_err().errors.len(), 2);
    }

    #[test]
    fn test_looks_like_email() {
        assert!(looks_like_email("jane@example.com"));
        assert!(looks_like_email(" jane.doe+tag@sub.example.co "));
        assert!(!looks_like_email("jane"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("jane@localhost"));
        assert!(!looks_like_email("jane@@example.com"));
        assert!(!looks_like_email("ja ne@example.com"));
    }
}
