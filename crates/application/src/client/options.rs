//! Per-call options and the raw response type.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use stockroom_domain::StatusCode;

use crate::error::ApiResult;
use crate::ports::TransportResponse;

/// How a call authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOptions {
    authenticated: bool,
    refresh_on_unauthorized: bool,
}

impl RequestOptions {
    /// Sends the bearer token and refreshes once on 401. The default.
    #[must_use]
    pub const fn authenticated() -> Self {
        Self {
            authenticated: true,
            refresh_on_unauthorized: true,
        }
    }

    /// Sends no token and treats 401 like any other 4xx. Used for the token
    /// endpoints themselves.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            authenticated: false,
            refresh_on_unauthorized: false,
        }
    }

    /// Keeps the token but reports a 401 as-is instead of refreshing.
    #[must_use]
    pub const fn without_refresh(self) -> Self {
        Self {
            refresh_on_unauthorized: false,
            ..self
        }
    }

    /// Whether the bearer token is attached.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Whether a 401 triggers refresh-and-replay.
    #[must_use]
    pub const fn refreshes_on_unauthorized(&self) -> bool {
        self.authenticated && self.refresh_on_unauthorized
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::authenticated()
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// Status code.
    pub status: StatusCode,
    /// Headers with lower-cased names.
    pub headers: BTreeMap<String, String>,
    /// Raw body.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Decodes the body as JSON. An empty body decodes as `null`.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Decode` if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        let body: &[u8] = if self.body.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &self.body
        };
        Ok(serde_json::from_slice(body)?)
    }

    /// The body as text, lossily decoded.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl From<TransportResponse> for ApiResponse {
    fn from(response: TransportResponse) -> Self {
        Self {
            status: response.status,
            headers: response.headers,
            body: response.body,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_option_combinations() {
        assert!(RequestOptions::default().refreshes_on_unauthorized());
        assert!(!RequestOptions::anonymous().is_authenticated());
        assert!(!RequestOptions::anonymous().refreshes_on_unauthorized());
        let no_refresh = RequestOptions::authenticated().without_refresh();
        assert!(no_refresh.is_authenticated());
        assert!(!no_refresh.refreshes_on_unauthorized());
    }

    #[test]
    fn test_empty_body_decodes_as_null() {
        let response = ApiResponse::from(TransportResponse::new(204, Vec::new()));
        let decoded: Option<u32> = response.json().unwrap();
        assert_eq!(decoded, None);
        let () = response.json().unwrap();
    }

    #[test]
    fn test_mismatched_body_is_decode_error() {
        let response = ApiResponse::from(TransportResponse::new(200, "[1, 2]"));
        let err = response.json::<String>().unwrap_err();
        assert!(matches!(err, crate::HttpError::Decode(_)));
    }
}
