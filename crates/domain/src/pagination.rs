//! Paginated list responses.

use serde::{Deserialize, Serialize};

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of matching items across all pages.
    pub count: u64,
    /// URL of the next page, if any.
    #[serde(default)]
    pub next: Option<String>,
    /// URL of the previous page, if any.
    #[serde(default)]
    pub previous: Option<String>,
    /// Items on this page.
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Wraps a full, unpaginated list.
    #[must_use]
    pub fn single(results: Vec<T>) -> Self {
        Self {
            count: results.len() as u64,
            next: None,
            previous: None,
            results,
        }
    }

    /// Whether another page follows.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Number of pages for a given page size.
    #[must_use]
    pub const fn total_pages(&self, page_size: u64) -> u64 {
        if page_size == 0 {
            return 0;
        }
        self.count.div_ceil(page_size)
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::single(Vec::new())
    }
}

/// A list endpoint body: either a page or a bare array.
///
/// Endpoints without pagination configured return the array directly.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    /// Paginated shape.
    Paged(Page<T>),
    /// Bare array.
    Plain(Vec<T>),
}

impl<T> ListResponse<T> {
    /// Normalizes either shape into a page.
    #[must_use]
    pub fn into_page(self) -> Page<T> {
        match self {
            Self::Paged(page) => page,
            Self::Plain(items) => Page::single(items),
        }
    }

    /// Drops pagination metadata.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.into_page().results
    }
}
