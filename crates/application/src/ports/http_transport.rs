//! HTTP transport port

use std::collections::BTreeMap;

use async_trait::async_trait;
use stockroom_domain::{HttpMethod, StatusCode};

/// A fully resolved request, ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute URL including the query string.
    pub url: String,
    /// Headers in send order.
    pub headers: Vec<(String, String)>,
    /// Raw body.
    pub body: Option<Vec<u8>>,
}

impl TransportRequest {
    /// Looks up a header, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response as received, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// Status code.
    pub status: StatusCode,
    /// Headers with lower-cased names.
    pub headers: BTreeMap<String, String>,
    /// Raw body.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Creates a response with no headers.
    #[must_use]
    pub fn new(status: impl Into<StatusCode>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: status.into(),
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }
}

/// Failures below the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Could not connect (DNS, refused, TLS).
    #[error("connection failed: {0}")]
    Connect(String),

    /// No response within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Anything else the transport reports.
    #[error("{0}")]
    Other(String),
}

/// Port for sending HTTP requests.
///
/// Implementations only move bytes; status interpretation, authentication
/// and retries belong to the API client.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends one request and returns whatever the server answered.
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` when no response was received.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}
