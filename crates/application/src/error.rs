//! Application error types

use std::collections::BTreeMap;

use stockroom_domain::{AuthError, DomainError, ErrorBody, ErrorKind, StatusCode};
use thiserror::Error;

use crate::ports::{StorageError, TransportError};

/// Failure of an API call, as seen by callers of the client.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(#[from] TransportError),

    /// The session is missing, expired, or could not be refreshed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The backend rejected the request (4xx).
    #[error("request rejected ({status}): {}", describe(.detail.as_deref(), .fields))]
    Validation {
        /// Response status.
        status: StatusCode,
        /// Request-level message, if any.
        detail: Option<String>,
        /// Per-field messages.
        fields: BTreeMap<String, Vec<String>>,
    },

    /// The backend failed (5xx).
    #[error("server error ({status}): {message}")]
    Server {
        /// Response status.
        status: StatusCode,
        /// Message to show the user.
        message: String,
    },

    /// A response body did not have the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The call was cancelled before it finished.
    #[error("request cancelled")]
    Cancelled,

    /// The request was rejected locally before being sent.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] DomainError),

    /// The session could not be persisted.
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl HttpError {
    /// Builds the error for a non-success response.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let parsed = ErrorBody::parse(body);
        if status.is_server_error() || !status.is_client_error() {
            return Self::Server {
                status,
                message: parsed
                    .summary()
                    .unwrap_or_else(|| status.reason_phrase().to_string()),
            };
        }
        let detail = parsed.detail.or_else(|| {
            (!parsed.non_field_errors.is_empty()).then(|| parsed.non_field_errors.join(" "))
        });
        Self::Validation {
            status,
            detail,
            fields: parsed.fields,
        }
    }

    /// Display category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::Network,
            Self::Auth(_) => ErrorKind::Auth,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Server { .. } => ErrorKind::Server,
            Self::Decode(_) | Self::Cancelled | Self::InvalidRequest(_) | Self::Storage(_) => {
                ErrorKind::Client
            }
        }
    }

    /// Response status, when the failure came from a response.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Validation { status, .. } | Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Per-field messages of a validation failure.
    #[must_use]
    pub const fn field_errors(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        match self {
            Self::Validation { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Whether the call was cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<serde_json::Error> for HttpError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

fn describe(detail: Option<&str>, fields: &BTreeMap<String, Vec<String>>) -> String {
    if let Some(detail) = detail {
        return detail.to_string();
    }
    let parts: Vec<String> = fields
        .iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join(" ")))
        .collect();
    if parts.is_empty() {
        "no details".to_string()
    } else {
        parts.join("; ")
    }
}

/// Result type alias for API calls.
pub type ApiResult<T> = Result<T, HttpError>;

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validation_from_field_errors() {
        let err = HttpError::from_response(
            StatusCode::new(400),
            br#"{"price": ["Ensure this value is greater than 0."]}"#,
        );
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.field_errors().map(BTreeMap::len), Some(1));
        assert_eq!(
            err.to_string(),
            "request rejected (400 Bad Request): price: Ensure this value is greater than 0."
        );
    }

    #[test]
    fn test_non_field_errors_become_detail() {
        let err = HttpError::from_response(
            StatusCode::new(400),
            br#"{"non_field_errors": ["Insufficient stock."]}"#,
        );
        match err {
            HttpError::Validation { detail, fields, .. } => {
                assert_eq!(detail.as_deref(), Some("Insufficient stock."));
                assert!(fields.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_server_error_message() {
        let err = HttpError::from_response(StatusCode::new(502), b"<html>bad gateway</html>");
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.to_string(), "server error (502 Bad Gateway): Bad Gateway");
        assert_eq!(err.status(), Some(StatusCode::new(502)));
    }

    #[test]
    fn test_client_side_kinds() {
        assert_eq!(HttpError::Cancelled.kind(), ErrorKind::Client);
        assert_eq!(HttpError::Decode("x".into()).kind(), ErrorKind::Client);
        assert_eq!(HttpError::Auth(AuthError::SessionExpired).kind(), ErrorKind::Auth);
        assert_eq!(
            HttpError::Network(TransportError::Timeout).kind(),
            ErrorKind::Network
        );
    }
}
