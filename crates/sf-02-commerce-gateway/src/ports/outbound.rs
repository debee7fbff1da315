//! Outbound Ports (Driven Ports)
//!
//! The wire the gateway sends through. Adapters own connection pooling,
//! credentials and timeouts.

use async_trait::async_trait;

use crate::domain::HttpMethod;

/// Fully resolved outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    /// Absolute URL without query string
    pub url: String,
    /// Query pairs to transmit, absent values already removed
    pub query: Vec<(String, String)>,
    /// JSON body
    pub body: Option<serde_json::Value>,
}

/// Raw upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    /// `Content-Type` header, empty when missing
    pub content_type: String,
    pub body: String,
}

impl TransportResponse {
    pub fn is_json(&self) -> bool {
        self.content_type.contains("application/json")
    }

    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// Transport failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// A connect, read or total timeout elapsed
    #[error("request timed out")]
    Timeout,
    /// Connection failed or broke
    #[error("network error: {0}")]
    Network(String),
    /// Transport was closed
    #[error("transport closed")]
    Closed,
    #[error("transport error: {0}")]
    Other(String),
}

/// HTTP transport (Driven Port)
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send one request. Non-2xx statuses are responses, not errors.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;

    /// Release pooled connections. Later sends fail with [`TransportError::Closed`].
    async fn close(&self);
}
