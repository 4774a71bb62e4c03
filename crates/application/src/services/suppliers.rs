//! Supplier endpoints

use std::sync::Arc;

use stockroom_domain::{ListResponse, QueryParams, Supplier, SupplierInput};

use crate::client::ApiClient;
use crate::endpoints::{self, SUPPLIERS};
use crate::error::ApiResult;

/// Supplier directory.
#[derive(Debug, Clone)]
pub struct SupplierService {
    client: Arc<ApiClient>,
}

impl SupplierService {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// All suppliers, optionally filtered by a search term.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn list(&self, search: Option<&str>) -> ApiResult<Vec<Supplier>> {
        let mut query = QueryParams::new();
        query.push_opt("search", search);
        self.client
            .get_json::<ListResponse<Supplier>>(SUPPLIERS, query)
            .await
            .map(ListResponse::into_items)
    }

    /// One supplier.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn get(&self, id: i64) -> ApiResult<Supplier> {
        self.client
            .get_json(&endpoints::item(SUPPLIERS, id), QueryParams::new())
            .await
    }

    /// Creates a supplier.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn create(&self, input: &SupplierInput) -> ApiResult<Supplier> {
        self.client.post_json(SUPPLIERS, input).await
    }

    /// Replaces a supplier.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn update(&self, id: i64, input: &SupplierInput) -> ApiResult<Supplier> {
        self.client
            .put_json(&endpoints::item(SUPPLIERS, id), input)
            .await
    }

    /// Deletes a supplier.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client.delete(&endpoints::item(SUPPLIERS, id)).await
    }
}
