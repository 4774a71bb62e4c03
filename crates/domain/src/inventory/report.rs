//! Inventory report served by `/api/reports/`.

use serde::{Deserialize, Serialize};

/// Units sold in one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySales {
    /// Month as an ISO date or `YYYY-MM` string.
    pub month: String,
    /// Units moved out during the month.
    pub total_quantity: i64,
}

/// A product ranked by movement count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopProduct {
    /// Product name.
    #[serde(rename = "product__name")]
    pub product_name: String,
    /// Number of movements recorded.
    pub total_movements: i64,
}

/// Current stock for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    /// Product name.
    pub name: String,
    /// Units on hand.
    pub quantity: i64,
}

/// Aggregates shown on the reports page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InventoryReport {
    /// Monthly sales trend.
    #[serde(default)]
    pub sales_by_month: Vec<MonthlySales>,
    /// Most frequently moved products.
    #[serde(default)]
    pub top_selling_products: Vec<TopProduct>,
    /// Stock per product.
    #[serde(default)]
    pub stock_levels: Vec<StockLevel>,
}

impl InventoryReport {
    /// Products at or below `threshold` units, lowest first.
    #[must_use]
    pub fn low_stock(&self, threshold: i64) -> Vec<&StockLevel> {
        let mut low: Vec<&StockLevel> = self
            .stock_levels
            .iter()
            .filter(|s| s.quantity <= threshold)
            .collect();
        low.sort_by_key(|s| s.quantity);
        low
    }
}
