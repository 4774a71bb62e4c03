//! Product endpoints

use std::sync::Arc;

use stockroom_domain::{
    ListResponse, Page, Product, ProductFilters, ProductId, ProductInput, ProductPatch,
    QueryParams,
};

use crate::client::ApiClient;
use crate::endpoints::{self, PRODUCTS, PRODUCT_SUGGESTIONS};
use crate::error::ApiResult;

/// Product catalogue.
#[derive(Debug, Clone)]
pub struct ProductService {
    client: Arc<ApiClient>,
}

impl ProductService {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// One page of products matching `filters`.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn list(&self, filters: &ProductFilters, page: u32) -> ApiResult<Page<Product>> {
        self.client
            .get_json::<ListResponse<Product>>(PRODUCTS, filters.to_query(page))
            .await
            .map(ListResponse::into_page)
    }

    /// Type-ahead matches for `search`.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn suggestions(&self, search: &str) -> ApiResult<Vec<Product>> {
        self.client
            .get_json::<ListResponse<Product>>(
                PRODUCT_SUGGESTIONS,
                QueryParams::new().with("search", search),
            )
            .await
            .map(ListResponse::into_items)
    }

    /// One product.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn get(&self, id: ProductId) -> ApiResult<Product> {
        self.client
            .get_json(&endpoints::item(PRODUCTS, id), QueryParams::new())
            .await
    }

    /// Creates a product after checking it locally.
    ///
    /// # Errors
    ///
    /// `HttpError::InvalidRequest` if the input fails local rules, otherwise
    /// any `HttpError` from the client.
    pub async fn create(&self, input: &ProductInput) -> ApiResult<Product> {
        input.validate()?;
        self.client.post_json(PRODUCTS, input).await
    }

    /// Replaces a product (PUT).
    ///
    /// # Errors
    ///
    /// As for [`create`](Self::create).
    pub async fn update(&self, id: ProductId, input: &ProductInput) -> ApiResult<Product> {
        input.validate()?;
        self.client
            .put_json(&endpoints::item(PRODUCTS, id), input)
            .await
    }

    /// Changes some fields of a product (PATCH).
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn patch(&self, id: ProductId, patch: &ProductPatch) -> ApiResult<Product> {
        self.client
            .patch_json(&endpoints::item(PRODUCTS, id), patch)
            .await
    }

    /// Deletes a product.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn delete(&self, id: ProductId) -> ApiResult<()> {
        self.client.delete(&endpoints::item(PRODUCTS, id)).await
    }
}
