//! Access/refresh token pair.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// The two bearer credentials issued by the backend, always kept together.
///
/// Both fields are non-empty; a pair that fails this check cannot be
/// constructed or deserialized. Serialized as `{"access": .., "refresh": ..}`,
/// which is both the backend's wire shape and the persisted record.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTokenPair")]
pub struct TokenPair {
    /// Short-lived access token sent as `Authorization: Bearer ..`.
    pub access: String,
    /// Longer-lived token used only to mint a new access token.
    pub refresh: String,
}

#[derive(Deserialize)]
struct RawTokenPair {
    access: String,
    refresh: String,
}

impl TryFrom<RawTokenPair> for TokenPair {
    type Error = DomainError;

    fn try_from(raw: RawTokenPair) -> DomainResult<Self> {
        Self::new(raw.access, raw.refresh)
    }
}

impl TokenPair {
    /// Creates a pair, rejecting empty credentials.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTokenPair` if either token is blank.
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> DomainResult<Self> {
        let access = access.into();
        let refresh = refresh.into();
        if access.trim().is_empty() {
            return Err(DomainError::InvalidTokenPair(
                "access token is empty".to_string(),
            ));
        }
        if refresh.trim().is_empty() {
            return Err(DomainError::InvalidTokenPair(
                "refresh token is empty".to_string(),
            ));
        }
        Ok(Self { access, refresh })
    }

    /// Returns the `Authorization` header value for this pair.
    #[must_use]
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.access)
    }

    /// Applies a refresh response, keeping the current refresh token when the
    /// backend did not rotate it.
    #[must_use]
    pub fn rotate(&self, refreshed: RefreshedTokens) -> Self {
        Self {
            access: refreshed.access,
            refresh: refreshed
                .refresh
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| self.refresh.clone()),
        }
    }

    /// A short, log-safe preview of the access token.
    #[must_use]
    pub fn access_preview(&self) -> String {
        token_preview(&self.access)
    }
}

// Credentials must never end up in logs via `{:?}`.
impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &token_preview(&self.access))
            .field("refresh", &"<redacted>")
            .finish()
    }
}

/// Body returned by the refresh endpoint.
///
/// Rotation is optional on the backend, so `refresh` may be absent.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshedTokens {
    /// The newly minted access token.
    pub access: String,
    /// A rotated refresh token, when the backend issues one.
    #[serde(default)]
    pub refresh: Option<String>,
}

impl fmt::Debug for RefreshedTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshedTokens")
            .field("access", &token_preview(&self.access))
            .field("rotated", &self.refresh.is_some())
            .finish()
    }
}

fn token_preview(token: &str) -> String {
    if token.len() > 12 {
        format!("{}...", token.chars().take(8).collect::<String>())
    } else {
        "***".to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_rejects_empty_tokens() {
        assert!(TokenPair::new("", "refresh").is_err());
        assert!(TokenPair::new("access", "  ").is_err());
        assert!(TokenPair::new("access", "refresh").is_ok());
    }

    #[test]
    fn test_deserialize_enforces_invariant() {
        let ok: TokenPair = serde_json::from_str(r#"{"access":"a","refresh":"r"}"#).unwrap();
        assert_eq!(ok.access, "a");

        let bad = serde_json::from_str::<TokenPair>(r#"{"access":"","refresh":"r"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_rotate_keeps_refresh_when_not_rotated() {
        let pair = TokenPair::new("old-access", "old-refresh").unwrap();
        let rotated = pair.rotate(RefreshedTokens {
            access: "new-access".to_string(),
            refresh: None,
        });
        assert_eq!(rotated.access, "new-access");
        assert_eq!(rotated.refresh, "old-refresh");

        let rotated = pair.rotate(RefreshedTokens {
            access: "new-access".to_string(),
            refresh: Some("new-refresh".to_string()),
        });
        assert_eq!(rotated.refresh, "new-refresh");
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let pair = TokenPair::new("abcdefghijklmnopqrstuvwxyz", "super-secret-refresh").unwrap();
        let debug = format!("{pair:?}");
        assert!(debug.contains("abcdefgh..."));
        assert!(!debug.contains("super-secret-refresh"));
    }

    #[test]
    fn test_bearer_header() {
        let pair = TokenPair::new("tok", "ref").unwrap();
        assert_eq!(pair.bearer_header(), "Bearer tok");
    }
}
