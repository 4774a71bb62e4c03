//! Purchase orders

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

use super::{Product, ProductId, Supplier};

/// Lifecycle state of a purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseOrderStatus {
    /// Created, awaiting approval.
    #[default]
    Pending,
    /// Approved, awaiting delivery.
    Approved,
    /// Goods received into stock.
    Received,
    /// Abandoned.
    Canceled,
}

impl PurchaseOrderStatus {
    /// Whether the order is still in progress.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }

    /// Only approved orders can be received into stock.
    #[must_use]
    pub const fn can_receive(self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// One line of a purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderItem {
    /// Line id.
    #[serde(default, deserialize_with = "crate::serde_helpers::opt_id")]
    pub id: Option<i64>,
    /// Product ordered.
    pub product: Product,
    /// Units ordered.
    pub quantity: u32,
    /// Unit cost as a decimal string.
    pub cost_per_unit: String,
}

/// A purchase order as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// Order id.
    #[serde(deserialize_with = "crate::serde_helpers::id")]
    pub id: i64,
    /// Supplier the order is placed with.
    pub supplier: Supplier,
    /// Current status.
    pub status: PurchaseOrderStatus,
    /// When the order was placed.
    pub order_date: DateTime<Utc>,
    /// Expected delivery date, when agreed.
    #[serde(default)]
    pub expected_delivery_date: Option<NaiveDate>,
    /// Id of the user who created the order.
    #[serde(default, deserialize_with = "crate::serde_helpers::opt_id")]
    pub created_by: Option<i64>,
    /// Sum of all lines, computed by the backend.
    #[serde(default, deserialize_with = "decimal_string")]
    pub total_cost: String,
    /// Ordered lines.
    #[serde(default)]
    pub items: Vec<PurchaseOrderItem>,
}

/// One line of a purchase order being created or replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseOrderItemInput {
    /// Product to order.
    pub product_id: ProductId,
    /// Units to order, at least one.
    pub quantity: u32,
    /// Unit cost as a decimal string.
    pub cost_per_unit: String,
}

/// Create/replace payload for a purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseOrderInput {
    /// Supplier to order from.
    pub supplier_id: i64,
    /// Initial or updated status.
    pub status: PurchaseOrderStatus,
    /// Expected delivery date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_delivery_date: Option<NaiveDate>,
    /// Lines; must not be empty and must not repeat a product.
    pub items: Vec<PurchaseOrderItemInput>,
}

impl PurchaseOrderInput {
    /// Checks line rules before sending.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidField` for an empty order, zero
    /// quantities, or the same product on two lines.
    pub fn validate(&self) -> DomainResult<()> {
        if self.items.is_empty() {
            return Err(DomainError::InvalidField {
                field: "items",
                message: "an order needs at least one item".to_string(),
            });
        }
        let mut seen = std::collections::BTreeSet::new();
        for item in &self.items {
            if item.quantity == 0 {
                return Err(DomainError::InvalidField {
                    field: "quantity",
                    message: format!("product {} has zero quantity", item.product_id),
                });
            }
            if !seen.insert(item.product_id) {
                return Err(DomainError::InvalidField {
                    field: "items",
                    message: format!("product {} appears more than once", item.product_id),
                });
            }
        }
        Ok(())
    }
}

// The backend renders decimals as strings but returns a bare `0` for orders
// without lines.
fn decimal_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a decimal, got {other}"
        ))),
    }
}
