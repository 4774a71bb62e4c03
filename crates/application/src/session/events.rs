//! Session lifecycle events

use std::fmt;

use serde::Serialize;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoutReason {
    /// The user logged out.
    UserRequested,
    /// An authenticated call was rejected and there was no session to refresh.
    NoSession,
    /// A call was rejected again after its token had been refreshed.
    SessionExpired,
    /// The refresh token was rejected or the exchange failed.
    RefreshFailed,
}

impl fmt::Display for LogoutReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UserRequested => "logged out",
            Self::NoSession => "not logged in",
            Self::SessionExpired => "session expired",
            Self::RefreshFailed => "session could not be refreshed",
        })
    }
}

/// Published on every session transition.
///
/// Front ends subscribe to react to forced logouts, e.g. by sending the
/// user back to the login prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A session was established by login or restored from storage.
    LoggedIn {
        /// Username from the access token.
        username: String,
    },
    /// The access token was replaced by a refresh.
    Refreshed,
    /// The session ended.
    LoggedOut {
        /// Why it ended.
        reason: LogoutReason,
    },
}

impl SessionEvent {
    /// True for forced logouts (anything but an explicit logout).
    #[must_use]
    pub const fn is_forced_logout(&self) -> bool {
        matches!(self, Self::LoggedOut { reason } if !matches!(reason, LogoutReason::UserRequested))
    }
}
