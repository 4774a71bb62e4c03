//! Authentication errors

use thiserror::Error;

use super::claims::ClaimsError;

/// Authentication failures.
///
/// Every variant except `InvalidCredentials` is terminal for the current
/// session: the client discards its tokens and the user has to log in again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No session exists; the request needed one.
    #[error("not authenticated")]
    NoSession,

    /// The backend rejected the username/password pair.
    #[error("{message}")]
    InvalidCredentials {
        /// Server-provided explanation.
        message: String,
    },

    /// The request was rejected again after a successful refresh.
    #[error("session expired")]
    SessionExpired,

    /// Exchanging the refresh token failed.
    #[error("failed to refresh session: {message}")]
    RefreshFailed {
        /// Error description.
        message: String,
    },

    /// The access token could not be decoded.
    #[error("invalid access token: {0}")]
    InvalidToken(#[from] ClaimsError),
}

impl AuthError {
    /// Whether this failure should discard the stored session.
    #[must_use]
    pub const fn ends_session(&self) -> bool {
        !matches!(self, Self::InvalidCredentials { .. })
    }
}
