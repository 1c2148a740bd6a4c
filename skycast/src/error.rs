//! Normalized API errors
//!
//! Every failure leaving the API client is one [`NormalizedError`]. Callers
//! match on [`ErrorKind`] and `status`; they never see a `reqwest::Error`.

use serde_json::Value;
use thiserror::Error;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";
pub const ALREADY_SUBSCRIBED_MESSAGE: &str = "Subscription already exists.";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "Unexpected error occurred.";

/// Transport codes, named after the usual browser HTTP client codes.
pub const CODE_TIMEOUT: &str = "ECONNABORTED";
pub const CODE_NETWORK: &str = "ERR_NETWORK";
pub const CODE_BAD_REQUEST: &str = "ERR_BAD_REQUEST";
pub const CODE_BAD_RESPONSE: &str = "ERR_BAD_RESPONSE";

/// Closed set of failure origins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// No response was received: connect failure, reset, timeout.
    Transport,
    /// A response arrived with a non-2xx status.
    Http,
    /// Client-side input check failed. Never reaches the network.
    Validation,
    /// Anything else, including undecodable payloads.
    Unexpected,
}

/// The single error shape shown to users.
///
/// `message` is never empty.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("{message}")]
pub struct NormalizedError {
    pub kind: ErrorKind,
    pub message: String,
    pub status: Option<u16>,
    pub code: Option<String>,
    pub details: Option<Value>,
}

impl NormalizedError {
    /// Normalize a non-2xx response from its status and raw body.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let details = parse_body(body);
        let backend_message = details.as_ref().and_then(backend_message);

        let message = match (status, backend_message) {
            (_, Some(message)) => message,
            (409, None) => ALREADY_SUBSCRIBED_MESSAGE.to_string(),
            (status, None) => format!("Request failed with status {status}"),
        };
        let code = if (400..500).contains(&status) {
            CODE_BAD_REQUEST
        } else {
            CODE_BAD_RESPONSE
        };

        Self {
            kind: ErrorKind::Http,
            message,
            status: Some(status),
            code: Some(code.to_string()),
            details,
        }
    }

    /// No response was ever received.
    pub fn transport(code: &str) -> Self {
        Self {
            kind: ErrorKind::Transport,
            message: NETWORK_ERROR_MESSAGE.to_string(),
            status: None,
            code: Some(code.to_string()),
            details: None,
        }
    }

    /// A generic fault whose own message is already user-presentable.
    pub fn runtime(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            UNEXPECTED_ERROR_MESSAGE.to_string()
        } else {
            message
        };
        Self {
            kind: ErrorKind::Unexpected,
            message,
            status: None,
            code: None,
            details: None,
        }
    }

    /// A failure of no recognised shape; the raw value is kept for inspection.
    pub fn unexpected(details: Value) -> Self {
        Self {
            kind: ErrorKind::Unexpected,
            message: UNEXPECTED_ERROR_MESSAGE.to_string(),
            status: None,
            code: None,
            details: Some(details),
        }
    }

    /// Client-side input failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: message.into(),
            status: None,
            code: None,
            details: None,
        }
    }

    /// Same error with a workflow-specific message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }

    pub fn is_conflict(&self) -> bool {
        self.status == Some(409)
    }
}

impl From<reqwest::Error> for NormalizedError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_builder() || error.is_decode() {
            return Self::runtime(error.to_string());
        }
        if let Some(status) = error.status() {
            return Self::from_response(status.as_u16(), &[]);
        }
        if error.is_timeout() {
            Self::transport(CODE_TIMEOUT)
        } else {
            Self::transport(CODE_NETWORK)
        }
    }
}

/// JSON bodies stay structured; anything else is kept as a JSON string.
fn parse_body(body: &[u8]) -> Option<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice(body) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(String::from_utf8_lossy(body).into_owned())),
    }
}

/// `{"message": "..."}` or a bare string body, passed through as sent.
///
/// Only string messages count; `{"message": 12}` falls back like a body
/// without one. Blank text counts as no message.
fn backend_message(body: &Value) -> Option<String> {
    let text = match body {
        Value::Object(map) => map.get("message")?.as_str()?,
        Value::String(text) => text.as_str(),
        _ => return None,
    };
    (!text.trim().is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::conflict_without_body(409, "", "Subscription already exists.")]
    #[case::conflict_with_empty_message(409, r#"{"message": ""}"#, "Subscription already exists.")]
    #[case::conflict_with_message(409, r#"{"message": "Email already subscribed"}"#, "Email already subscribed")]
    #[case::not_found_json(404, r#"{"message": "City not found"}"#, "City not found")]
    #[case::not_found_plain_text(404, "no such city", "no such city")]
    #[case::json_string_body(400, r#""Invalid input""#, "Invalid input")]
    #[case::message_kept_verbatim(400, r#"{"message": "  Invalid email\n"}"#, "  Invalid email\n")]
    #[case::conflict_with_blank_message(409, r#"{"message": " \n "}"#, "Subscription already exists.")]
    #[case::blank_plain_text(500, "\"   \"", "Request failed with status 500")]
    #[case::message_not_a_string(400, r#"{"message": 12}"#, "Request failed with status 400")]
    #[case::object_without_message(500, r#"{"error": "boom"}"#, "Request failed with status 500")]
    #[case::array_body(502, "[1, 2]", "Request failed with status 502")]
    #[case::empty_body(503, "", "Request failed with status 503")]
    fn test_response_message(#[case] status: u16, #[case] body: &str, #[case] expected: &str) {
        let error = NormalizedError::from_response(status, body.as_bytes());
        assert_eq!(error.kind, ErrorKind::Http);
        assert_eq!(error.status, Some(status));
        assert_eq!(error.message, expected);
    }

    #[rstest]
    #[case(400, CODE_BAD_REQUEST)]
    #[case(404, CODE_BAD_REQUEST)]
    #[case(409, CODE_BAD_REQUEST)]
    #[case(500, CODE_BAD_RESPONSE)]
    #[case(503, CODE_BAD_RESPONSE)]
    fn test_response_code(#[case] status: u16, #[case] code: &str) {
        let error = NormalizedError::from_response(status, b"");
        assert_eq!(error.code.as_deref(), Some(code));
    }

    #[test]
    fn test_response_details_keep_body() {
        let error = NormalizedError::from_response(422, br#"{"message": "bad email", "field": "email"}"#);
        assert_eq!(
            error.details,
            Some(json!({"message": "bad email", "field": "email"}))
        );

        let error = NormalizedError::from_response(500, b"Internal Server Error");
        assert_eq!(error.details, Some(json!("Internal Server Error")));

        let error = NormalizedError::from_response(500, b"  \n");
        assert_eq!(error.details, None);
    }

    #[test]
    fn test_transport_has_no_status() {
        let error = NormalizedError::transport(CODE_TIMEOUT);
        assert_eq!(error.kind, ErrorKind::Transport);
        assert_eq!(error.message, "Network error. Please try again.");
        assert_eq!(error.status, None);
        assert_eq!(error.code.as_deref(), Some("ECONNABORTED"));
    }

    #[test]
    fn test_runtime_keeps_message() {
        let error = NormalizedError::runtime("expected value at line 1 column 1");
        assert_eq!(error.message, "expected value at line 1 column 1");
        assert_eq!(error.status, None);
        assert_eq!(error.code, None);
        assert_eq!(error.details, None);

        assert_eq!(NormalizedError::runtime("").message, UNEXPECTED_ERROR_MESSAGE);
    }

    #[test]
    fn test_unexpected_stores_raw_value() {
        let error = NormalizedError::unexpected(json!({"temp": "warm"}));
        assert_eq!(error.message, "Unexpected error occurred.");
        assert_eq!(error.kind, ErrorKind::Unexpected);
        assert_eq!(error.status, None);
        assert_eq!(error.details, Some(json!({"temp": "warm"})));
    }

    #[test]
    fn test_display_is_message() {
        let error = NormalizedError::validation("Please enter your email address.");
        assert_eq!(error.to_string(), "Please enter your email address.");
        assert!(!error.is_not_found());
        assert!(NormalizedError::from_response(409, b"").is_conflict());
    }
}
