//! Normalized gateway error.
//!
//! Every failure of a gateway call, whether raised upstream, on the wire, or
//! by local validation, surfaces as one [`GatewayError`].

use serde::Serialize;
use std::fmt;

/// Failure category of a [`GatewayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Upstream answered with a 4xx/5xx status
    Http,
    /// Request exceeded a timeout
    Timeout,
    /// Connection could not be established or broke mid-flight
    Network,
    /// Unclassified local failure
    Internal,
    /// Upstream answered successfully with an unusable payload
    UnexpectedResponse,
    /// Request rejected locally before transmission
    Validation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Timeout => "timeout",
            Self::Network => "network",
            Self::Internal => "internal",
            Self::UnexpectedResponse => "unexpected_response",
            Self::Validation => "validation",
        }
    }
}

/// Gateway error with optional upstream status and details
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayError {
    /// Failure category
    pub kind: ErrorKind,
    /// Human-readable message
    pub message: String,
    /// Upstream HTTP status, present only for [`ErrorKind::Http`]
    pub status_code: Option<u16>,
    /// Decoded error body, raw text, or offending payload
    pub details: Option<serde_json::Value>,
}

impl GatewayError {
    /// Create a new gateway error
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
            details: None,
        }
    }

    /// Attach details
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Upstream error whose body decoded to a structured error object
    pub fn upstream(status: u16, message: &str, body: serde_json::Value) -> Self {
        Self {
            kind: ErrorKind::Http,
            message: format!("Commerce API error: {}", message),
            status_code: Some(status),
            details: Some(body),
        }
    }

    /// Upstream error whose body could not be decoded
    pub fn http_status(status: u16, raw_body: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Http,
            message: format!("HTTP error {} from commerce API", status),
            status_code: Some(status),
            details: Some(serde_json::Value::String(raw_body.into())),
        }
    }

    /// Request timed out
    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout, "Request to commerce API timed out")
    }

    /// Network or connection failure
    pub fn network() -> Self {
        Self::new(
            ErrorKind::Network,
            "Network error while connecting to commerce API",
        )
    }

    /// Unexpected local failure
    pub fn internal() -> Self {
        Self::new(
            ErrorKind::Internal,
            "Unexpected error while calling commerce API",
        )
    }

    /// Successful call with an unusable payload
    pub fn unexpected_response(message: impl Into<String>, payload: serde_json::Value) -> Self {
        Self::new(ErrorKind::UnexpectedResponse, message).with_details(payload)
    }

    /// Local validation failure
    pub fn validation(details: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Validation,
            format!("Invalid request: {}", details.into()),
        )
    }

    /// Upstream answered 404
    pub fn is_not_found(&self) -> bool {
        self.status_code == Some(404)
    }

    /// Upstream could not be reached or failed on its side
    pub fn is_unavailable(&self) -> bool {
        match self.kind {
            ErrorKind::Timeout | ErrorKind::Network => true,
            ErrorKind::Http => self.status_code.is_some_and(|s| s >= 500),
            _ => false,
        }
    }

    /// Machine-readable `code` of a structured upstream error body
    pub fn upstream_code(&self) -> Option<&str> {
        self.details
            .as_ref()
            .and_then(|d| d.get("code"))
            .and_then(|c| c.as_str())
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(status) => write!(f, "[{}] {}", status, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for GatewayError {}

impl Serialize for GatewayError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("GatewayError", 4)?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("message", &self.message)?;
        if let Some(status) = self.status_code {
            state.serialize_field("status_code", &status)?;
        }
        if let Some(ref details) = self.details {
            state.serialize_field("details", details)?;
        }
        state.end()
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
