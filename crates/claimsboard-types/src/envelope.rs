//! Uniform response envelope returned by every portal API call
//!
//! `{ success, message?, data?, error? }` with `error = { code, message, details? }`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code used when no response reached the client (network, timeout, TLS)
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

/// Error code used when the login endpoint fails without an error body
pub const LOGIN_FAILED: &str = "LOGIN_FAILED";

/// Error code used when a response body is not a portal envelope
pub const INVALID_RESPONSE: &str = "INVALID_RESPONSE";

/// Free-form error details: either a message or a field map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetails {
    Text(String),
    Fields(serde_json::Map<String, serde_json::Value>),
}

/// Error payload of a failed call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

impl ApiErrorDetail {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Transport-level failure (no response reached the client)
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(UNKNOWN_ERROR, message)
    }

    pub fn with_details(mut self, details: ErrorDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// True when this error was synthesized for a transport failure
    pub fn is_transport(&self) -> bool {
        self.code == UNKNOWN_ERROR
    }

    /// Per-field messages, when the server sent a field map
    pub fn field_messages(&self) -> Vec<(String, String)> {
        match &self.details {
            Some(ErrorDetails::Fields(map)) => map
                .iter()
                .map(|(field, value)| {
                    let text = match value {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (field.clone(), text)
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for ApiErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

impl std::error::Error for ApiErrorDetail {}

/// `{ success, message?, data?, error? }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorDetail>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: ApiErrorDetail) -> Self {
        Self {
            success: false,
            message: None,
            data: None,
            error: Some(error),
        }
    }

    /// Collapse the envelope into a `Result`.
    ///
    /// A `success: true` envelope without data, or a failed envelope without an
    /// error body, is reported with `fallback_code`.
    pub fn into_result(self, fallback_code: &str) -> Result<T, ApiErrorDetail> {
        match (self.success, self.data, self.error) {
            (true, Some(data), _) => Ok(data),
            (_, _, Some(error)) => Err(error),
            (true, None, None) => Err(ApiErrorDetail::new(
                fallback_code,
                self.message
                    .unwrap_or_else(|| "Response contained no data".to_string()),
            )),
            (false, _, None) => Err(ApiErrorDetail::new(
                fallback_code,
                self.message
                    .unwrap_or_else(|| "Request failed".to_string()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_deserializes_with_field_details() {
        let json = r#"{
            "success": false,
            "error": {
                "code": "VALIDATION_ERROR",
                "message": "Invalid input",
                "details": { "email": "Email already registered" }
            }
        }"#;

        let response: ApiResponse<serde_json::Value> = serde_json::from_str(json).unwrap();
        assert!(!response.success);
        assert!(response.data.is_none());

        let error = response.error.unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert_eq!(
            error.field_messages(),
            vec![("email".to_string(), "Email already registered".to_string())]
        );
    }

    #[test]
    fn test_text_details() {
        let json = r#"{"code":"NOT_FOUND","message":"Claim not found","details":"id=42"}"#;
        let error: ApiErrorDetail = serde_json::from_str(json).unwrap();
        assert_eq!(error.details, Some(ErrorDetails::Text("id=42".to_string())));
        assert!(error.field_messages().is_empty());
    }

    #[test]
    fn test_into_result() {
        assert_eq!(ApiResponse::ok(5).into_result("X"), Ok(5));

        let failed: ApiResponse<u8> = ApiResponse::failure(ApiErrorDetail::unknown("offline"));
        let error = failed.into_result("X").unwrap_err();
        assert!(error.is_transport());

        let empty: ApiResponse<u8> = ApiResponse {
            success: true,
            message: None,
            data: None,
            error: None,
        };
        assert_eq!(empty.into_result("EMPTY").unwrap_err().code, "EMPTY");
    }
}
