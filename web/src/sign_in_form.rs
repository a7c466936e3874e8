// src/sign_in_form.rs
//! Sign-in / sign-up form state
//!
//! Mode is `SignIn` or `SignUp`; status is `Idle`, `Submitting` or
//! `Error(message)`. Nothing here stops a second `begin_submit` while one is
//! in flight; the rendered form disables its button while `loading`.

use std::fmt::Display;

use crate::auth_client::{SignInEmail, SignUpEmail};

const FALLBACK_ERROR: &str = "Authentication failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    SignIn,
    SignUp,
}

impl FormMode {
    /// Value carried by the form's hidden `mode` field
    pub fn as_str(&self) -> &'static str {
        match self {
            FormMode::SignIn => "sign-in",
            FormMode::SignUp => "sign-up",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "sign-up" => FormMode::SignUp,
            _ => FormMode::SignIn,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Error(String),
}

/// What a submission asks the backend to do
#[derive(Debug, Clone)]
pub enum Submission {
    SignIn(SignInEmail),
    SignUp(SignUpEmail),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInForm {
    pub mode: FormMode,
    pub status: FormStatus,
    pub email: String,
    pub password: String,
    pub name: String,
    pub loading: bool,
}

impl SignInForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches between sign-in and sign-up. Field values are kept.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            FormMode::SignIn => FormMode::SignUp,
            FormMode::SignUp => FormMode::SignIn,
        };
        if matches!(self.status, FormStatus::Error(_)) {
            self.status = FormStatus::Idle;
        }
    }

    pub fn begin_submit(&mut self) -> Submission {
        self.status = FormStatus::Submitting;
        self.loading = true;

        match self.mode {
            FormMode::SignIn => Submission::SignIn(SignInEmail {
                email: self.email.clone(),
                password: self.password.clone(),
                remember_me: None,
            }),
            FormMode::SignUp => Submission::SignUp(SignUpEmail {
                name: self.name.clone(),
                email: self.email.clone(),
                password: self.password.clone(),
                image: None,
            }),
        }
    }

    /// An error with an empty message is shown as "Authentication failed"
    pub fn finish_submit<E: Display>(&mut self, result: Result<(), E>) {
        self.loading = false;
        self.status = match result {
            Ok(()) => FormStatus::Idle,
            Err(e) => {
                let message = e.to_string();
                if message.trim().is_empty() {
                    FormStatus::Error(FALLBACK_ERROR.to_string())
                } else {
                    FormStatus::Error(message)
                }
            }
        };
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            FormStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::SignIn => "Sign In",
            FormMode::SignUp => "Sign Up",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.loading {
            "Loading..."
        } else {
            self.title()
        }
    }

    pub fn toggle_label(&self) -> &'static str {
        match self.mode {
            FormMode::SignIn => "Don't have an account? Sign Up",
            FormMode::SignUp => "Already have an account? Sign In",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(mode: FormMode) -> SignInForm {
        SignInForm {
            mode,
            email: "jane@example.com".to_string(),
            password: "hunter22".to_string(),
            name: "Jane".to_string(),
            ..SignInForm::new()
        }
    }

    #[test]
    fn test_starts_idle_in_sign_in_mode() {
        let form = SignInForm::new();
        assert_eq!(form.mode, FormMode::SignIn);
        assert_eq!(form.status, FormStatus::Idle);
        assert!(!form.loading);
        assert_eq!(form.submit_label(), "Sign In");
    }

    #[test]
    fn test_toggle_keeps_fields_and_clears_error() {
        let mut form = filled(FormMode::SignIn);
        form.status = FormStatus::Error("Invalid email or password".to_string());

        form.toggle_mode();
        assert_eq!(form.mode, FormMode::SignUp);
        assert_eq!(form.status, FormStatus::Idle);
        assert_eq!(form.email, "jane@example.com");
        assert_eq!(form.password, "hunter22");
        assert_eq!(form.toggle_label(), "Already have an account? Sign In");

        form.toggle_mode();
        assert_eq!(form.mode, FormMode::SignIn);
        assert_eq!(form.toggle_label(), "Don't have an account? Sign Up");
    }

    #[test]
    fn test_begin_submit_builds_request_for_mode() {
        let mut form = filled(FormMode::SignIn);
        match form.begin_submit() {
            Submission::SignIn(body) => {
                assert_eq!(body.email, "jane@example.com");
                assert_eq!(body.password, "hunter22");
            }
            other => panic!("unexpected submission {other:?}"),
        }
        assert_eq!(form.status, FormStatus::Submitting);
        assert!(form.loading);
        assert_eq!(form.submit_label(), "Loading...");

        let mut form = filled(FormMode::SignUp);
        assert!(matches!(form.begin_submit(), Submission::SignUp(body) if body.name == "Jane"));
    }

    #[test]
    fn test_begin_submit_clears_previous_error() {
        let mut form = filled(FormMode::SignIn);
        form.finish_submit(Err("nope"));
        form.begin_submit();
        assert_eq!(form.error(), None);
    }

    #[test]
    fn test_success_returns_to_idle() {
        let mut form = filled(FormMode::SignIn);
        form.begin_submit();
        form.finish_submit::<String>(Ok(()));
        assert_eq!(form.status, FormStatus::Idle);
        assert!(!form.loading);
    }

    #[test]
    fn test_failure_shows_message_or_fallback() {
        let mut form = filled(FormMode::SignIn);
        form.begin_submit();
        form.finish_submit(Err("Invalid email or password"));
        assert_eq!(form.error(), Some("Invalid email or password"));
        assert!(!form.loading);

        form.begin_submit();
        form.finish_submit(Err(""));
        assert_eq!(form.error(), Some("Authentication failed"));
    }

    #[test]
    fn test_second_submit_is_not_guarded() {
        let mut form = filled(FormMode::SignIn);
        form.begin_submit();
        assert!(matches!(form.begin_submit(), Submission::SignIn(_)));
        assert_eq!(form.status, FormStatus::Submitting);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!(FormMode::parse("sign-up"), FormMode::SignUp);
        assert_eq!(FormMode::parse("sign-in"), FormMode::SignIn);
        assert_eq!(FormMode::parse("garbage"), FormMode::SignIn);
    }
}
