//! Single-flight access-token refresh.
//!
//! The coordinator is a two-state machine. In IDLE, the first caller that
//! presents a stale access token becomes the leader, moves the state to
//! REFRESHING and performs the exchange. Callers arriving while REFRESHING
//! subscribe to the leader's outcome instead of starting their own exchange.
//! The leader publishes the outcome and returns the state to IDLE. If its
//! task is dropped mid-exchange nothing is published; waiters see the
//! channel close and race to take the lead themselves.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use stockroom_domain::{AuthError, RefreshedTokens};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{ApiResult, HttpError};

use super::{LogoutReason, SessionStore};

/// New access token, or why none could be obtained.
type Outcome = Result<String, AuthError>;

enum RefreshState {
    Idle,
    Refreshing(watch::Receiver<Option<Outcome>>),
}

enum Turn {
    Leader(watch::Sender<Option<Outcome>>),
    Waiter(watch::Receiver<Option<Outcome>>),
}

/// Coalesces concurrent refreshes into one exchange.
pub struct RefreshCoordinator {
    session: Arc<SessionStore>,
    state: Mutex<RefreshState>,
    exchanges: AtomicU64,
}

impl RefreshCoordinator {
    /// Creates an idle coordinator writing to `session`.
    #[must_use]
    pub const fn new(session: Arc<SessionStore>) -> Self {
        Self {
            session,
            state: Mutex::new(RefreshState::Idle),
            exchanges: AtomicU64::new(0),
        }
    }

    /// Whether an exchange is in flight.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        matches!(
            *self.state.lock().unwrap_or_else(PoisonError::into_inner),
            RefreshState::Refreshing(_)
        )
    }

    /// Number of exchanges performed so far.
    #[must_use]
    pub fn exchanges(&self) -> u64 {
        self.exchanges.load(Ordering::Relaxed)
    }

    /// Returns an access token newer than `stale_access`.
    ///
    /// If the session already holds a different access token, it is returned
    /// without an exchange. Otherwise `exchange` is called with the refresh
    /// token, unless another caller is already refreshing, in which case this
    /// call waits for that result.
    ///
    /// A failed exchange clears the session and publishes
    /// `LoggedOut { reason: RefreshFailed }`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NoSession` if there is no session, or
    /// `AuthError::RefreshFailed` if the exchange failed.
    pub async fn refresh<F, Fut>(&self, stale_access: &str, exchange: F) -> Outcome
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = ApiResult<RefreshedTokens>>,
    {
        if let Some(current) = self.superseded(stale_access).await? {
            return Ok(current);
        }

        let sender = loop {
            match self.take_turn() {
                Turn::Leader(sender) => break sender,
                Turn::Waiter(receiver) => {
                    debug!("waiting for in-flight refresh");
                    if let Some(outcome) = wait(receiver).await {
                        return outcome;
                    }
                    debug!("in-flight refresh abandoned, taking over");
                }
            }
        };
        let mut guard = LeaderGuard {
            coordinator: self,
            sender: Some(sender),
        };

        // Another leader may have finished between the check and taking the lead.
        let refresh_token = match self.session.tokens().await {
            None => return guard.finish(Err(AuthError::NoSession)),
            Some(current) if current.access != stale_access => {
                return guard.finish(Ok(current.access));
            }
            Some(current) => current.refresh,
        };

        self.exchanges.fetch_add(1, Ordering::Relaxed);
        info!("refreshing access token");
        let result = match exchange(refresh_token).await {
            Ok(refreshed) => self.session.rotate(refreshed).await,
            Err(e) => Err(e),
        };

        let outcome = match result {
            Ok(tokens) => {
                info!(access = %tokens.access_preview(), "access token refreshed");
                Ok(tokens.access)
            }
            // Logged out while the exchange was running.
            Err(HttpError::Auth(AuthError::NoSession)) => Err(AuthError::NoSession),
            Err(e) => {
                warn!(error = %e, "token refresh failed, ending session");
                self.session.clear(LogoutReason::RefreshFailed).await;
                Err(AuthError::RefreshFailed {
                    message: e.to_string(),
                })
            }
        };
        guard.finish(outcome)
    }

    async fn superseded(&self, stale_access: &str) -> Result<Option<String>, AuthError> {
        let current = self.session.tokens().await.ok_or(AuthError::NoSession)?;
        if current.access == stale_access {
            Ok(None)
        } else {
            debug!("access token already superseded, reusing it");
            Ok(Some(current.access))
        }
    }

    fn take_turn(&self) -> Turn {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match &*state {
            RefreshState::Refreshing(receiver) => Turn::Waiter(receiver.clone()),
            RefreshState::Idle => {
                let (sender, receiver) = watch::channel(None);
                *state = RefreshState::Refreshing(receiver);
                Turn::Leader(sender)
            }
        }
    }

    fn set_idle(&self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = RefreshState::Idle;
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("refreshing", &self.is_refreshing())
            .field("exchanges", &self.exchanges())
            .finish_non_exhaustive()
    }
}

/// `None` when the leader went away without publishing.
async fn wait(mut receiver: watch::Receiver<Option<Outcome>>) -> Option<Outcome> {
    receiver
        .wait_for(Option::is_some)
        .await
        .ok()
        .and_then(|outcome| (*outcome).clone())
}

/// Returns the coordinator to IDLE when the leader finishes or is dropped.
/// Only a finished leader publishes an outcome.
struct LeaderGuard<'a> {
    coordinator: &'a RefreshCoordinator,
    sender: Option<watch::Sender<Option<Outcome>>>,
}

impl LeaderGuard<'_> {
    fn finish(&mut self, outcome: Outcome) -> Outcome {
        if let Some(sender) = self.sender.take() {
            self.coordinator.set_idle();
            sender.send_replace(Some(outcome.clone()));
        }
        outcome
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        // Closing the channel without a value hands the refresh to a waiter.
        if let Some(sender) = self.sender.take() {
            warn!("refresh dropped mid-exchange");
            self.coordinator.set_idle();
            drop(sender);
        }
    }
}
