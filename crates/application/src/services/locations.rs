//! Location endpoints

use std::sync::Arc;

use stockroom_domain::{ListResponse, Location, LocationId, LocationInput, QueryParams};

use crate::client::ApiClient;
use crate::endpoints::{self, LOCATIONS};
use crate::error::ApiResult;

/// Warehouses and stores.
#[derive(Debug, Clone)]
pub struct LocationService {
    client: Arc<ApiClient>,
}

impl LocationService {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// All locations.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn list(&self) -> ApiResult<Vec<Location>> {
        self.client
            .get_json::<ListResponse<Location>>(LOCATIONS, QueryParams::new())
            .await
            .map(ListResponse::into_items)
    }

    /// One location.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn get(&self, id: LocationId) -> ApiResult<Location> {
        self.client
            .get_json(&endpoints::item(LOCATIONS, id), QueryParams::new())
            .await
    }

    /// Creates a location.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn create(&self, input: &LocationInput) -> ApiResult<Location> {
        self.client.post_json(LOCATIONS, input).await
    }

    /// Replaces a location.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn update(&self, id: LocationId, input: &LocationInput) -> ApiResult<Location> {
        self.client
            .put_json(&endpoints::item(LOCATIONS, id), input)
            .await
    }

    /// Deletes a location.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn delete(&self, id: LocationId) -> ApiResult<()> {
        self.client.delete(&endpoints::item(LOCATIONS, id)).await
    }
}
