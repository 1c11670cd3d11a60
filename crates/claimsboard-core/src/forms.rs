//! Client-side form checks
//!
//! Run before any request is sent; a non-empty result means the form is not
//! submitted.

use claimsboard_types::{DocumentType, LoginPayload, RegisterPayload};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub const MISSING_UPLOAD_FIELDS: &str = "Please select a file and document type";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// First message for `field`, if any
pub fn message_for<'a>(errors: &'a [FieldError], field: &str) -> Option<&'a str> {
    errors
        .iter()
        .find(|e| e.field == field)
        .map(|e| e.message.as_str())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email.trim())
}

pub fn validate_login(payload: &LoginPayload) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if !is_valid_email(&payload.email) {
        errors.push(FieldError::new("email", "Please enter a valid email address."));
    }
    if payload.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required."));
    }
    errors
}

pub fn validate_register(payload: &RegisterPayload) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if payload.first_name.trim().chars().count() < 2 {
        errors.push(FieldError::new(
            "firstName",
            "First name must be at least 2 characters.",
        ));
    }
    if payload.last_name.trim().chars().count() < 2 {
        errors.push(FieldError::new(
            "lastName",
            "Last name must be at least 2 characters.",
        ));
    }
    if !is_valid_email(&payload.email) {
        errors.push(FieldError::new("email", "Please enter a valid email address."));
    }
    if payload.password.chars().count() < 8 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 8 characters.",
        ));
    }
    errors
}

pub fn validate_upload(has_file: bool, document_type: Option<DocumentType>) -> Vec<FieldError> {
    if has_file && document_type.is_some() {
        Vec::new()
    } else {
        vec![FieldError::new("document", MISSING_UPLOAD_FIELDS)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(first: &str, last: &str, email: &str, password: &str) -> RegisterPayload {
        RegisterPayload {
            email: email.into(),
            password: password.into(),
            first_name: first.into(),
            last_name: last.into(),
        }
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email(" jane.doe+x@mail.example.org "));
        assert!(!is_valid_email("jane@"));
        assert!(!is_valid_email("jane example@x.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_login_rules() {
        let errors = validate_login(&LoginPayload {
            email: "nope".into(),
            password: String::new(),
        });
        assert_eq!(
            message_for(&errors, "email"),
            Some("Please enter a valid email address.")
        );
        assert_eq!(message_for(&errors, "password"), Some("Password is required."));

        assert!(validate_login(&LoginPayload {
            email: "jane@example.com".into(),
            password: "x".into(),
        })
        .is_empty());
    }

    #[test]
    fn test_register_rules() {
        let errors = validate_register(&register("J", "D", "jane@example.com", "short"));
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["firstName", "lastName", "password"]);

        assert!(validate_register(&register("Jo", "Li", "jo@li.io", "12345678")).is_empty());
    }

    #[test]
    fn test_upload_rules() {
        assert!(validate_upload(true, Some(DocumentType::Invoice)).is_empty());
        let errors = validate_upload(false, Some(DocumentType::Invoice));
        assert_eq!(errors[0].message, MISSING_UPLOAD_FIELDS);
        assert_eq!(validate_upload(true, None).len(), 1);
    }
}
