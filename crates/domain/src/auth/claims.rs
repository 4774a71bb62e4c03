//! Claims decoded from the access token.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an access token could not be decoded into a [`SessionUser`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    /// The token is not three dot-separated segments.
    #[error("token is not a JWT: expected 3 segments, found {0}")]
    Malformed(usize),

    /// The payload segment is not valid base64url.
    #[error("token payload is not base64url: {0}")]
    Encoding(String),

    /// The payload is not a JSON object with the expected claims.
    #[error("token payload has unexpected claims: {0}")]
    Claims(String),
}

/// The signed-in user as described by the access token.
///
/// This is derived data: it is recomputed every time the access token
/// changes and is never persisted on its own. The signature is not
/// verified here; the backend remains the authority on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Subject id of the authenticated user.
    #[serde(deserialize_with = "crate::serde_helpers::id")]
    pub user_id: i64,
    /// Login name.
    #[serde(default)]
    pub username: String,
    /// Whether the backend grants administrator rights.
    #[serde(default)]
    pub is_staff: bool,
    /// Expiry as a unix timestamp.
    pub exp: i64,
    /// Issue time as a unix timestamp.
    #[serde(default)]
    pub iat: Option<i64>,
    /// Unique token id.
    #[serde(default)]
    pub jti: Option<String>,
    /// `access` or `refresh`.
    #[serde(default)]
    pub token_type: Option<String>,
}

impl SessionUser {
    /// Decodes the claims carried by an access token.
    ///
    /// # Errors
    ///
    /// Returns a `ClaimsError` if the token is not a well-formed JWT or its
    /// payload lacks the required claims.
    pub fn from_access_token(token: &str) -> Result<Self, ClaimsError> {
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 {
            return Err(ClaimsError::Malformed(segments.len()));
        }

        let payload = URL_SAFE_NO_PAD
            .decode(segments[1].trim_end_matches('='))
            .map_err(|e| ClaimsError::Encoding(e.to_string()))?;

        serde_json::from_slice(&payload).map_err(|e| ClaimsError::Claims(e.to_string()))
    }

    /// When the access token stops being accepted.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Whether the token has expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Seconds remaining until expiry at `now` (negative once expired).
    #[must_use]
    pub fn seconds_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        self.exp - now.timestamp()
    }
}
