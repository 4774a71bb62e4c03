//! Stock movement endpoints

use std::sync::Arc;

use stockroom_domain::{InventoryMovement, ListResponse, MovementFilters, MovementInput, Page};

use crate::client::ApiClient;
use crate::endpoints::MOVEMENTS;
use crate::error::ApiResult;

/// Stock movement log.
#[derive(Debug, Clone)]
pub struct MovementService {
    client: Arc<ApiClient>,
}

impl MovementService {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// One page of movements matching `filters`.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn list(
        &self,
        filters: &MovementFilters,
        page: u32,
    ) -> ApiResult<Page<InventoryMovement>> {
        self.client
            .get_json::<ListResponse<InventoryMovement>>(MOVEMENTS, filters.to_query(page))
            .await
            .map(ListResponse::into_page)
    }

    /// Records a movement. The backend adjusts stock and rejects movements
    /// that would take it below zero.
    ///
    /// # Errors
    ///
    /// `HttpError::InvalidRequest` for a non-positive quantity, otherwise any
    /// `HttpError` from the client.
    pub async fn create(&self, input: &MovementInput) -> ApiResult<InventoryMovement> {
        input.validate()?;
        self.client.post_json(MOVEMENTS, input).await
    }
}
