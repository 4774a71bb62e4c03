//! Report endpoint

use std::sync::Arc;

use stockroom_domain::{InventoryReport, QueryParams};

use crate::client::ApiClient;
use crate::endpoints::REPORTS;
use crate::error::ApiResult;

/// Dashboard aggregates.
#[derive(Debug, Clone)]
pub struct ReportService {
    client: Arc<ApiClient>,
}

impl ReportService {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Sales trend, top products, and stock levels.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn inventory(&self) -> ApiResult<InventoryReport> {
        self.client.get_json(REPORTS, QueryParams::new()).await
    }
}
