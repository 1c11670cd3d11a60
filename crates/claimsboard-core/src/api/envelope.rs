//! Response envelope adapter
//!
//! Every API client (native `reqwest`, browser `gloo-net`) reduces a call to a
//! [`RawOutcome`] and hands it to [`into_envelope`], so transport failures
//! and malformed bodies are shaped in exactly one place:
//!
//! - no response (network, timeout, TLS) → `UNKNOWN_ERROR`
//! - body that parses as an envelope, any status → passed through unchanged
//! - anything else → `HTTP_<status>` or `INVALID_RESPONSE`

use claimsboard_types::envelope::INVALID_RESPONSE;
use claimsboard_types::{ApiErrorDetail, ApiResponse};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// What came back from the wire, before interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawOutcome {
    Response { status: u16, body: String },
    /// The request never produced a response
    Transport(String),
}

/// Normalize a raw outcome into the portal envelope
pub fn into_envelope<T: DeserializeOwned>(outcome: RawOutcome) -> ApiResponse<T> {
    match outcome {
        RawOutcome::Transport(message) => {
            warn!(error = %message, "API request failed before a response arrived");
            ApiResponse::failure(ApiErrorDetail::unknown(message))
        }
        RawOutcome::Response { status, body } => from_body(status, &body),
    }
}

fn from_body<T: DeserializeOwned>(status: u16, body: &str) -> ApiResponse<T> {
    match serde_json::from_str::<ApiResponse<T>>(body) {
        Ok(envelope) => {
            debug!(status, success = envelope.success, "API response");
            envelope
        }
        Err(parse_error) => {
            // A failure envelope whose `data` does not match T still carries a usable error
            if let Ok(ApiResponse {
                error: Some(error), ..
            }) = serde_json::from_str::<ApiResponse<serde_json::Value>>(body)
            {
                return ApiResponse::failure(error);
            }

            let error = if (200..300).contains(&status) {
                ApiErrorDetail::new(
                    INVALID_RESPONSE,
                    format!("Unexpected response from server: {parse_error}"),
                )
            } else {
                ApiErrorDetail::new(
                    format!("HTTP_{status}"),
                    format!("Request failed with status {status}"),
                )
            };
            warn!(status, code = %error.code, "API response was not a valid envelope");
            ApiResponse::failure(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimsboard_types::LoginData;

    #[test]
    fn test_transport_failure_is_unknown_error() {
        let response: ApiResponse<LoginData> =
            into_envelope(RawOutcome::Transport("connection refused".into()));
        assert!(!response.success);
        let error = response.error.unwrap();
        assert_eq!(error.code, "UNKNOWN_ERROR");
        assert_eq!(error.message, "connection refused");
    }

    #[test]
    fn test_server_error_envelope_passes_through() {
        let body = r#"{"success":false,"error":{"code":"INVALID_CREDENTIALS","message":"Invalid email or password"}}"#;
        let response: ApiResponse<LoginData> = into_envelope(RawOutcome::Response {
            status: 401,
            body: body.into(),
        });
        assert_eq!(
            response.error,
            Some(ApiErrorDetail::new(
                "INVALID_CREDENTIALS",
                "Invalid email or password"
            ))
        );
    }

    #[test]
    fn test_success_envelope() {
        let body = r#"{"success":true,"data":{"token":"t","user":{"userId":"u","email":"e","firstName":"f","lastName":"l"}}}"#;
        let response: ApiResponse<LoginData> = into_envelope(RawOutcome::Response {
            status: 200,
            body: body.into(),
        });
        assert!(response.success);
        assert_eq!(response.data.unwrap().token, "t");
    }

    #[test]
    fn test_error_with_mismatched_data_keeps_error() {
        let body = r#"{"success":false,"data":"oops","error":{"code":"X","message":"m"}}"#;
        let response: ApiResponse<LoginData> = into_envelope(RawOutcome::Response {
            status: 400,
            body: body.into(),
        });
        assert_eq!(response.error.unwrap().code, "X");
    }

    #[test]
    fn test_non_envelope_bodies() {
        let response: ApiResponse<LoginData> = into_envelope(RawOutcome::Response {
            status: 502,
            body: "<html>Bad Gateway</html>".into(),
        });
        assert_eq!(response.error.unwrap().code, "HTTP_502");

        let response: ApiResponse<LoginData> = into_envelope(RawOutcome::Response {
            status: 200,
            body: "[]".into(),
        });
        assert_eq!(response.error.unwrap().code, "INVALID_RESPONSE");
    }
}
