//! Latest-wins request slot.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use tokio_util::sync::CancellationToken;

use crate::error::ApiResult;

use super::cancellable;

/// Hands out one cancellation token per fetch and cancels the previous one,
/// so a stale response can never overwrite a fresher one.
#[derive(Debug, Default)]
pub struct LatestRequest {
    current: Mutex<Option<CancellationToken>>,
}

impl LatestRequest {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels the outstanding fetch, if any, and returns the token for a
    /// new one.
    pub fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let previous = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(token.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }
        token
    }

    /// Cancels the outstanding fetch without starting another.
    pub fn cancel(&self) {
        let previous = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(previous) = previous {
            previous.cancel();
        }
    }

    /// Runs `future` as the new latest fetch.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Cancelled` if a newer fetch starts first.
    pub async fn run<T, F>(&self, future: F) -> ApiResult<T>
    where
        F: Future<Output = ApiResult<T>>,
    {
        let token = self.begin();
        cancellable(&token, future).await
    }
}
