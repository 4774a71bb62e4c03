//! Purchase order endpoints

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use stockroom_domain::{
    ListResponse, Page, PurchaseOrder, PurchaseOrderInput, QueryParams,
};

use crate::client::ApiClient;
use crate::endpoints::{self, PURCHASE_ORDERS};
use crate::error::ApiResult;

#[derive(Deserialize)]
struct ReceiveResponse {
    #[serde(default)]
    status: String,
}

/// Purchase orders placed with suppliers.
#[derive(Debug, Clone)]
pub struct PurchaseOrderService {
    client: Arc<ApiClient>,
}

impl PurchaseOrderService {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// One page of orders.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn list(&self, page: u32) -> ApiResult<Page<PurchaseOrder>> {
        let mut query = QueryParams::new();
        if page > 1 {
            query.push("page", page);
        }
        self.client
            .get_json::<ListResponse<PurchaseOrder>>(PURCHASE_ORDERS, query)
            .await
            .map(ListResponse::into_page)
    }

    /// One order.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn get(&self, id: i64) -> ApiResult<PurchaseOrder> {
        self.client
            .get_json(&endpoints::item(PURCHASE_ORDERS, id), QueryParams::new())
            .await
    }

    /// Places an order after checking its lines.
    ///
    /// # Errors
    ///
    /// `HttpError::InvalidRequest` for an empty order or bad lines, otherwise
    /// any `HttpError` from the client.
    pub async fn create(&self, input: &PurchaseOrderInput) -> ApiResult<PurchaseOrder> {
        input.validate()?;
        self.client.post_json(PURCHASE_ORDERS, input).await
    }

    /// Replaces an order.
    ///
    /// # Errors
    ///
    /// As for [`create`](Self::create).
    pub async fn update(&self, id: i64, input: &PurchaseOrderInput) -> ApiResult<PurchaseOrder> {
        input.validate()?;
        self.client
            .put_json(&endpoints::item(PURCHASE_ORDERS, id), input)
            .await
    }

    /// Marks an approved order as received; the backend books the stock.
    /// Returns the backend's confirmation message.
    ///
    /// # Errors
    ///
    /// `HttpError::Validation` if the order is not approved, otherwise any
    /// `HttpError` from the client.
    pub async fn receive(&self, id: i64) -> ApiResult<String> {
        let response: ReceiveResponse = self
            .client
            .post_json(&endpoints::action(PURCHASE_ORDERS, id, "receive"), &json!({}))
            .await?;
        Ok(response.status)
    }

    /// Deletes an order.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client.delete(&endpoints::item(PURCHASE_ORDERS, id)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{Reply, harness, pair, path_of};
    use pretty_assertions::assert_eq;
    use stockroom_domain::ErrorKind;

    #[tokio::test]
    async fn test_receive() {
        let h = harness(Some(pair("a")), |request| match path_of(&request.url) {
            "/api/purchase-orders/3/receive/" => {
                Reply::json(200, &json!({"status": "Order received and stock successfully updated."}))
            }
            _ => Reply::json(400, &json!({"error": "Only approved purchase orders can be received."})),
        })
        .await;
        let orders = PurchaseOrderService::new(h.client.clone());

        let message = orders.receive(3).await.unwrap();
        assert_eq!(message, "Order received and stock successfully updated.");

        let err = orders.receive(4).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("Only approved"));
    }
}
