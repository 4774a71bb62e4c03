//! Persisted session store.
//!
//! Holds the current token pair and the claims decoded from its access
//! token. The pair is written through to `TokenStorage` under the same lock
//! that updates the in-memory snapshot, so storage and memory never diverge.

use std::sync::Arc;

use stockroom_domain::{AuthError, RefreshedTokens, SessionUser, TokenPair};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};

use crate::error::ApiResult;
use crate::ports::{Clock, StorageError, SystemClock, TokenStorage};

use super::{LogoutReason, SessionEvent};

const EVENT_CAPACITY: usize = 16;
const DEFAULT_REFRESH_BUFFER_SECONDS: i64 = 60;

#[derive(Default)]
struct SessionState {
    tokens: Option<TokenPair>,
    user: Option<SessionUser>,
}

/// Thread-safe session state with write-through persistence.
pub struct SessionStore {
    storage: Arc<dyn TokenStorage>,
    clock: Arc<dyn Clock>,
    state: RwLock<SessionState>,
    events: broadcast::Sender<SessionEvent>,
    /// Seconds before expiry at which the access token counts as expiring.
    refresh_buffer_seconds: i64,
}

impl SessionStore {
    /// Creates an empty store backed by `storage`. Call [`restore`](Self::restore)
    /// to pick up a persisted session.
    #[must_use]
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            storage,
            clock: Arc::new(SystemClock),
            state: RwLock::new(SessionState::default()),
            events,
            refresh_buffer_seconds: DEFAULT_REFRESH_BUFFER_SECONDS,
        }
    }

    /// Replaces the clock used for expiry checks.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets how many seconds before expiry the access token counts as expiring.
    #[must_use]
    pub fn with_refresh_buffer(mut self, refresh_buffer_seconds: i64) -> Self {
        self.refresh_buffer_seconds = refresh_buffer_seconds;
        self
    }

    /// Subscribes to session events. Dropping the receiver unsubscribes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Loads the persisted pair, if any.
    ///
    /// A record whose access token cannot be decoded, or that cannot be
    /// parsed at all, is discarded and treated as logged out.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Storage` if the record cannot be read.
    pub async fn restore(&self) -> ApiResult<Option<SessionUser>> {
        let loaded = match self.storage.load().await {
            Ok(loaded) => loaded,
            Err(StorageError::Serialization(message)) => {
                warn!(%message, "discarding unreadable session record");
                self.discard_record().await;
                None
            }
            Err(e) => return Err(e.into()),
        };
        let Some(tokens) = loaded else {
            debug!("no persisted session");
            return Ok(None);
        };

        let user = match SessionUser::from_access_token(&tokens.access) {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "discarding session with undecodable access token");
                self.discard_record().await;
                return Ok(None);
            }
        };

        {
            let mut state = self.state.write().await;
            state.tokens = Some(tokens);
            state.user = Some(user.clone());
        }
        info!(username = %user.username, "restored session");
        self.publish(SessionEvent::LoggedIn {
            username: user.username.clone(),
        });
        Ok(Some(user))
    }

    /// Starts a session from a freshly issued pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the access token cannot be
    /// decoded, or `HttpError::Storage` if it cannot be persisted.
    pub async fn establish(&self, tokens: TokenPair) -> ApiResult<SessionUser> {
        let user = SessionUser::from_access_token(&tokens.access).map_err(AuthError::from)?;
        {
            let mut state = self.state.write().await;
            self.storage.save(&tokens).await?;
            state.tokens = Some(tokens);
            state.user = Some(user.clone());
        }
        info!(username = %user.username, "session established");
        self.publish(SessionEvent::LoggedIn {
            username: user.username.clone(),
        });
        Ok(user)
    }

    /// Applies a refresh response to the current pair and persists it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NoSession` if the session ended meanwhile,
    /// `AuthError::InvalidToken` for an undecodable access token, or
    /// `HttpError::Storage` if persisting fails.
    pub(crate) async fn rotate(&self, refreshed: RefreshedTokens) -> ApiResult<TokenPair> {
        let rotated = {
            let mut state = self.state.write().await;
            let current = state.tokens.as_ref().ok_or(AuthError::NoSession)?;
            let rotated = current.rotate(refreshed);
            let user = SessionUser::from_access_token(&rotated.access).map_err(AuthError::from)?;
            self.storage.save(&rotated).await?;
            state.tokens = Some(rotated.clone());
            state.user = Some(user);
            rotated
        };
        debug!(access = %rotated.access_preview(), "access token rotated");
        self.publish(SessionEvent::Refreshed);
        Ok(rotated)
    }

    /// Ends the session and publishes `LoggedOut`. Returns whether a session
    /// existed.
    ///
    /// Storage failures are logged; the in-memory session is cleared
    /// regardless.
    pub async fn clear(&self, reason: LogoutReason) -> bool {
        let had_session = {
            let mut state = self.state.write().await;
            state.user = None;
            let had_session = state.tokens.take().is_some();
            self.discard_record().await;
            had_session
        };
        info!(%reason, had_session, "session cleared");
        self.publish(SessionEvent::LoggedOut { reason });
        had_session
    }

    async fn discard_record(&self) {
        if let Err(e) = self.storage.clear().await {
            warn!(error = %e, "failed to remove persisted session");
        }
    }

    /// The current token pair.
    pub async fn tokens(&self) -> Option<TokenPair> {
        self.state.read().await.tokens.clone()
    }

    /// The current access token.
    pub async fn access_token(&self) -> Option<String> {
        self.state
            .read()
            .await
            .tokens
            .as_ref()
            .map(|t| t.access.clone())
    }

    /// Claims of the current access token.
    pub async fn user(&self) -> Option<SessionUser> {
        self.state.read().await.user.clone()
    }

    /// Whether a token pair is held.
    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.tokens.is_some()
    }

    /// Expiry status of the access token, for display.
    pub async fn status(&self) -> SessionStatus {
        let state = self.state.read().await;
        let Some(user) = state.user.as_ref() else {
            return SessionStatus::NotAuthenticated;
        };
        let remaining = user.seconds_until_expiry(self.clock.now());
        if remaining <= 0 {
            SessionStatus::Expired
        } else if remaining <= self.refresh_buffer_seconds {
            SessionStatus::Expiring {
                seconds_remaining: remaining,
            }
        } else {
            SessionStatus::Valid {
                seconds_remaining: remaining,
            }
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("refresh_buffer_seconds", &self.refresh_buffer_seconds)
            .finish_non_exhaustive()
    }
}

/// Status of the access token for display.
///
/// An expired access token does not end the session: the next call gets a
/// 401 and the refresh token mints a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionStatus {
    /// No session.
    NotAuthenticated,
    /// Token is valid and not expiring soon.
    Valid {
        /// Seconds until expiry.
        seconds_remaining: i64,
    },
    /// Token is valid but will expire soon.
    Expiring {
        /// Seconds until expiry.
        seconds_remaining: i64,
    },
    /// Token has expired.
    Expired,
}

impl SessionStatus {
    /// Returns true if a session exists, expired or not.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        !matches!(self, Self::NotAuthenticated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{EXP, MemoryStorage, pair};
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[tokio::test]
    async fn test_establish_persists_and_publishes() {
        let storage = Arc::new(MemoryStorage::default());
        let store = SessionStore::new(storage.clone());
        let mut events = store.subscribe();

        let user = store.establish(pair("a")).await.unwrap();

        assert_eq!(user.username, "maria");
        assert_eq!(storage.stored(), Some(pair("a")));
        assert_eq!(
            events.recv().await.unwrap(),
            SessionEvent::LoggedIn {
                username: "maria".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_establish_rejects_undecodable_token() {
        let storage = Arc::new(MemoryStorage::default());
        let store = SessionStore::new(storage.clone());
        let tokens = TokenPair::new("not-a-jwt", "refresh").unwrap();

        let err = store.establish(tokens).await.unwrap_err();

        assert!(matches!(
            err,
            crate::HttpError::Auth(AuthError::InvalidToken(_))
        ));
        assert!(!store.is_authenticated().await);
        assert_eq!(storage.stored(), None);
    }

    #[tokio::test]
    async fn test_restore_discards_bad_record() {
        let storage = Arc::new(MemoryStorage::with(
            TokenPair::new("garbage", "refresh").unwrap(),
        ));
        let store = SessionStore::new(storage.clone());

        assert_eq!(store.restore().await.unwrap(), None);
        assert_eq!(storage.stored(), None);
    }

    #[tokio::test]
    async fn test_rotate_keeps_refresh_when_not_rotated() {
        let storage = Arc::new(MemoryStorage::with(pair("a")));
        let store = SessionStore::new(storage.clone());
        store.restore().await.unwrap();

        let refreshed: RefreshedTokens =
            serde_json::from_value(serde_json::json!({"access": pair("b").access})).unwrap();
        let rotated = store.rotate(refreshed).await.unwrap();

        assert_eq!(rotated.access, pair("b").access);
        assert_eq!(rotated.refresh, "refresh-a");
        assert_eq!(storage.stored(), Some(rotated));
    }

    #[tokio::test]
    async fn test_clear_reports_previous_state() {
        let storage = Arc::new(MemoryStorage::with(pair("a")));
        let store = SessionStore::new(storage.clone());
        store.restore().await.unwrap();
        let mut events = store.subscribe();

        assert!(store.clear(LogoutReason::UserRequested).await);
        assert!(!store.clear(LogoutReason::NoSession).await);

        assert_eq!(storage.stored(), None);
        assert_eq!(store.user().await, None);
        assert_eq!(
            events.recv().await.unwrap(),
            SessionEvent::LoggedOut {
                reason: LogoutReason::UserRequested
            }
        );
    }

    #[tokio::test]
    async fn test_status_uses_clock() {
        let storage = Arc::new(MemoryStorage::with(pair("a")));
        let now = Utc.timestamp_opt(EXP - 30, 0).unwrap();
        let store = SessionStore::new(storage).with_clock(Arc::new(FixedClock(now)));
        assert_eq!(store.status().await, SessionStatus::NotAuthenticated);

        store.restore().await.unwrap();
        assert_eq!(
            store.status().await,
            SessionStatus::Expiring {
                seconds_remaining: 30
            }
        );

        let store = store.with_refresh_buffer(10);
        assert_eq!(
            store.status().await,
            SessionStatus::Valid {
                seconds_remaining: 30
            }
        );
    }
}
