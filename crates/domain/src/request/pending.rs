//! Replayable description of an outbound API call.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{DomainError, DomainResult};
use crate::filters::QueryParams;

use super::HttpMethod;

/// Everything needed to send, and re-send, one API call.
///
/// The client captures a `PendingRequest` before dispatch so that a call
/// rejected with 401 can be replayed once with a fresh access token. The
/// `retried` flag records that the single replay has been spent.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path relative to the API base URL, starting with `/`.
    pub path: String,
    /// Query-string parameters.
    pub query: QueryParams,
    /// Extra headers. `Authorization` is managed by the client.
    pub headers: BTreeMap<String, String>,
    /// JSON body.
    pub body: Option<Value>,
    retried: bool,
}

impl PendingRequest {
    /// Creates a request with no query, headers, or body.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::new(),
            headers: BTreeMap::new(),
            body: None,
            retried: false,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST request with a JSON body.
    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    /// Sets the query parameters.
    #[must_use]
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Whether the one permitted replay has already happened.
    #[must_use]
    pub const fn is_retried(&self) -> bool {
        self.retried
    }

    /// Records that the request is being replayed.
    pub const fn mark_retried(&mut self) {
        self.retried = true;
    }

    /// Checks the path is a relative API path.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPath` for empty, absolute-URL, or
    /// non-rooted paths.
    pub fn validate(&self) -> DomainResult<()> {
        let path = self.path.trim();
        if path.is_empty() {
            return Err(DomainError::InvalidPath("path is empty".to_string()));
        }
        if path.contains("://") {
            return Err(DomainError::InvalidPath(format!(
                "{path} is an absolute URL; pass a path relative to the API base"
            )));
        }
        if !path.starts_with('/') {
            return Err(DomainError::InvalidPath(format!("{path} must start with '/'")));
        }
        Ok(())
    }

    /// Path plus encoded query string.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is invalid or the query cannot be encoded.
    pub fn path_and_query(&self) -> DomainResult<String> {
        self.validate()?;
        if self.query.is_empty() {
            return Ok(self.path.clone());
        }
        let query = self.query.to_query_string()?;
        let separator = if self.path.contains('?') { '&' } else { '?' };
        Ok(format!("{}{separator}{query}", self.path))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_path_and_query() {
        let request = PendingRequest::get("/api/products/")
            .with_query(QueryParams::new().with("search", "bolt").with("page", 2));
        assert_eq!(
            request.path_and_query().unwrap(),
            "/api/products/?search=bolt&page=2"
        );

        let bare = PendingRequest::get("/api/reports/");
        assert_eq!(bare.path_and_query().unwrap(), "/api/reports/");
    }

    #[test]
    fn test_validate_rejects_bad_paths() {
        assert!(PendingRequest::get("").validate().is_err());
        assert!(PendingRequest::get("api/products/").validate().is_err());
        assert!(
            PendingRequest::get("https://evil.example.com/api/")
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_retry_flag() {
        let mut request = PendingRequest::post("/api/token/", json!({"username": "a"}));
        assert!(!request.is_retried());
        request.mark_retried();
        assert!(request.is_retried());
        assert_eq!(request.body, Some(json!({"username": "a"})));
    }
}
