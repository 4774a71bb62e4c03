//! Debounced, latest-wins product suggestions.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use stockroom_domain::Product;

use crate::error::{ApiResult, HttpError};
use crate::services::ProductService;

use super::LatestRequest;

/// Queries shorter than this clear the suggestions without a request.
pub const MIN_QUERY_CHARS: usize = 2;

/// Default pause before a query is sent.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// What a search did to the visible suggestions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// This search was the newest; its results are now visible.
    Applied(Vec<Product>),
    /// The query was too short; suggestions were cleared.
    Cleared,
    /// A newer search started; nothing was changed.
    Superseded,
}

#[derive(Default)]
struct Visible {
    generation: u64,
    products: Vec<Product>,
}

/// Type-ahead product search.
///
/// Each call to [`search`](Self::search) supersedes the previous one: the
/// earlier call is cancelled and, even if its response arrives, it never
/// touches the visible suggestions.
pub struct SuggestionSearch {
    products: ProductService,
    debounce: Duration,
    latest: LatestRequest,
    visible: Mutex<Visible>,
}

impl SuggestionSearch {
    /// Creates a search with the given debounce delay.
    #[must_use]
    pub fn new(products: ProductService, debounce: Duration) -> Self {
        Self {
            products,
            debounce,
            latest: LatestRequest::new(),
            visible: Mutex::new(Visible::default()),
        }
    }

    /// Runs a search for `query` after the debounce delay.
    ///
    /// # Errors
    ///
    /// Returns the request error only if this search is still the newest;
    /// failures of superseded searches are swallowed.
    pub async fn search(&self, query: &str) -> ApiResult<SearchOutcome> {
        let generation = self.next_generation();
        let query = query.trim();

        if query.chars().count() < MIN_QUERY_CHARS {
            self.latest.cancel();
            return Ok(if self.apply(generation, Vec::new()) {
                SearchOutcome::Cleared
            } else {
                SearchOutcome::Superseded
            });
        }

        let fetch = async {
            tokio::time::sleep(self.debounce).await;
            self.products.suggestions(query).await
        };
        match self.latest.run(fetch).await {
            Ok(products) if self.apply(generation, products.clone()) => {
                Ok(SearchOutcome::Applied(products))
            }
            Ok(_) | Err(HttpError::Cancelled) => Ok(SearchOutcome::Superseded),
            Err(_) if !self.is_current(generation) => Ok(SearchOutcome::Superseded),
            Err(e) => Err(e),
        }
    }

    /// Suggestions currently shown.
    #[must_use]
    pub fn visible(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    /// Cancels any pending search and clears the suggestions.
    pub fn clear(&self) {
        self.latest.cancel();
        let mut visible = self.lock();
        visible.generation += 1;
        visible.products.clear();
    }

    fn next_generation(&self) -> u64 {
        let mut visible = self.lock();
        visible.generation += 1;
        visible.generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.lock().generation == generation
    }

    /// Stores `products` if `generation` is still the newest search.
    fn apply(&self, generation: u64, products: Vec<Product>) -> bool {
        let mut visible = self.lock();
        if visible.generation != generation {
            return false;
        }
        visible.products = products;
        true
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Visible> {
        self.visible.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SuggestionSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionSearch")
            .field("debounce", &self.debounce)
            .finish_non_exhaustive()
    }
}
