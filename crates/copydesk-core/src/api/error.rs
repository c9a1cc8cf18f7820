//! Structured errors for the API layer.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Categories of API errors for consistent handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// The server rejected the credential (HTTP 401). The session has
    /// already been cleared by the time the caller sees this.
    SessionExpired,
    /// HTTP status error (4xx other than 401, 5xx) or transport failure.
    HttpStatus,
    /// Connection timeout or request timeout.
    Timeout,
    /// Failed to parse the response body.
    Parse,
    /// The envelope arrived with `success: false`.
    Api,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::SessionExpired => write!(f, "session_expired"),
            ApiErrorKind::HttpStatus => write!(f, "http_status"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::Parse => write!(f, "parse"),
            ApiErrorKind::Api => write!(f, "api"),
        }
    }
}

/// Structured error from the API with kind and details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error category
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// Optional additional details (e.g., raw error body)
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Creates a session-expired error from a 401 body.
    pub fn session_expired(body: &str) -> Self {
        Self {
            kind: ApiErrorKind::SessionExpired,
            message: extract_message(body).unwrap_or_else(|| "Session expired".to_string()),
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    /// Creates an HTTP status error, pulling a cleaner message out of the
    /// body when it carries a JSON envelope.
    pub fn http_status(status: u16, body: &str) -> Self {
        let message = match extract_message(body) {
            Some(msg) => format!("HTTP {status}: {msg}"),
            None => format!("HTTP {status}"),
        };
        Self {
            kind: ApiErrorKind::HttpStatus,
            message,
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Timeout, message)
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Parse, message)
    }

    /// Creates an error for a `success: false` envelope.
    pub fn api(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Api, message)
    }

    /// Returns true if this error means the session was invalidated.
    pub fn is_session_expired(&self) -> bool {
        self.kind == ApiErrorKind::SessionExpired
    }
}

/// Pulls a `message` field out of an envelope-shaped error body.
fn extract_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    json.get("message")
        .and_then(Value::as_str)
        .filter(|msg| !msg.is_empty())
        .map(ToString::to_string)
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::timeout(format!("Request timed out: {err}"))
        } else if err.is_decode() {
            ApiError::parse(format!("Failed to decode response: {err}"))
        } else {
            ApiError::new(ApiErrorKind::HttpStatus, format!("Request failed: {err}"))
        }
    }
}

/// Result type for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_extracts_envelope_message() {
        let body = r#"{"success": false, "message": "Post not found", "data": null}"#;
        let err = ApiError::http_status(404, body);
        assert_eq!(err.kind, ApiErrorKind::HttpStatus);
        assert_eq!(err.message, "HTTP 404: Post not found");
        assert!(err.details.is_some());
    }

    #[test]
    fn http_status_without_body_keeps_plain_message() {
        let err = ApiError::http_status(500, "");
        assert_eq!(err.message, "HTTP 500");
        assert!(err.details.is_none());
    }

    #[test]
    fn session_expired_prefers_server_message() {
        let body = r#"{"success": false, "message": "Token expired"}"#;
        let err = ApiError::session_expired(body);
        assert!(err.is_session_expired());
        assert_eq!(err.message, "Token expired");
    }

    #[test]
    fn session_expired_falls_back_on_junk_body() {
        let err = ApiError::session_expired("<html>nope</html>");
        assert_eq!(err.message, "Session expired");
    }
}
