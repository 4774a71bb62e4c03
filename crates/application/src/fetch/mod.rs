//! Cancellable, latest-wins fetches.

mod latest;
mod suggestions;

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::{ApiResult, HttpError};

pub use latest::LatestRequest;
pub use suggestions::{DEFAULT_DEBOUNCE, MIN_QUERY_CHARS, SearchOutcome, SuggestionSearch};

/// Races `future` against `cancel`. A cancelled future is dropped, which
/// aborts its in-flight request.
///
/// # Errors
///
/// Returns `HttpError::Cancelled` if `cancel` fires first, otherwise the
/// future's own result.
pub async fn cancellable<T, F>(cancel: &CancellationToken, future: F) -> ApiResult<T>
where
    F: Future<Output = ApiResult<T>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(HttpError::Cancelled),
        result = future => result,
    }
}
