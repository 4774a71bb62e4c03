//! List filters and query-string construction.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{DomainError, DomainResult};
use crate::inventory::{LocationId, MovementType, ProductId};

/// Ordered query-string parameters. Empty values are never added.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Creates an empty parameter list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a parameter unless its value is empty.
    pub fn push(&mut self, name: impl Into<String>, value: impl ToString) {
        let value = value.to_string();
        if !value.trim().is_empty() {
            self.0.push((name.into(), value));
        }
    }

    /// Appends a parameter when the value is present.
    pub fn push_opt<V: ToString>(&mut self, name: impl Into<String>, value: Option<V>) {
        if let Some(v) = value {
            self.push(name, v);
        }
    }

    /// Builder-style `push`.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.push(name, value);
        self
    }

    /// Whether no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The parameters as name/value pairs.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    /// Looks up the first value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Encodes as `application/x-www-form-urlencoded`, without a leading `?`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuery` if encoding fails.
    pub fn to_query_string(&self) -> DomainResult<String> {
        serde_urlencoded::to_string(&self.0).map_err(|e| DomainError::InvalidQuery(e.to_string()))
    }
}

/// Filters for the product list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductFilters {
    /// Free-text search.
    pub search: Option<String>,
    /// Only active / only inactive products.
    pub is_active: Option<bool>,
    /// Only products running low.
    pub low_stock: bool,
}

impl ProductFilters {
    /// Builds the query for a page; pages below 1 are clamped to 1.
    #[must_use]
    pub fn to_query(&self, page: u32) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("search", self.search.as_deref());
        params.push_opt("is_active", self.is_active);
        if self.low_stock {
            params.push("low_stock", true);
        }
        params.push("page", page.max(1));
        params
    }
}

/// Filters for the movement log.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MovementFilters {
    /// Only movements of this product.
    pub product: Option<ProductId>,
    /// Only this direction; `None` means all.
    pub movement_type: Option<MovementType>,
    /// Inclusive lower date bound.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub end_date: Option<NaiveDate>,
    /// Only movements at this location.
    pub location: Option<LocationId>,
}

impl MovementFilters {
    /// Builds the query for a page; page 1 is implied and not sent.
    #[must_use]
    pub fn to_query(&self, page: u32) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("product", self.product);
        params.push_opt("movement_type", self.movement_type);
        params.push_opt("start_date", self.start_date.map(|d| d.format("%Y-%m-%d")));
        params.push_opt("end_date", self.end_date.map(|d| d.format("%Y-%m-%d")));
        params.push_opt("location", self.location);
        if page > 1 {
            params.push("page", page);
        }
        params
    }
}
