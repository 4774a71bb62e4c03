//! Products

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Primary key of a product.
pub type ProductId = i64;

/// A stocked product.
///
/// `price` is kept as the decimal string the backend emits (`"12.50"`) so no
/// precision is lost on the way through the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product id.
    #[serde(deserialize_with = "crate::serde_helpers::id")]
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Unit price as a decimal string.
    pub price: String,
    /// Units on hand.
    #[serde(default)]
    pub quantity: i64,
    /// Inactive products cannot receive movements.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Full create/replace payload for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    /// Display name, at least 2 characters after trimming.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Unit price as a decimal string, greater than zero.
    pub price: String,
    /// Units on hand.
    #[serde(default)]
    pub quantity: i64,
    /// Whether the product is active.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl ProductInput {
    /// Applies the backend's field rules locally.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidField` for a short name, a non-positive
    /// or unparseable price, or a negative quantity.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().chars().count() < 2 {
            return Err(DomainError::InvalidField {
                field: "name",
                message: "name must be at least 2 characters long".to_string(),
            });
        }
        validate_price(&self.price)?;
        if self.quantity < 0 {
            return Err(DomainError::InvalidField {
                field: "quantity",
                message: "quantity cannot be negative".to_string(),
            });
        }
        Ok(())
    }
}

/// Partial product update; only set fields are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ProductPatch {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New unit price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    /// New quantity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    /// New active flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

fn validate_price(price: &str) -> DomainResult<()> {
    let parsed = price
        .trim()
        .parse::<f64>()
        .map_err(|_| DomainError::InvalidField {
            field: "price",
            message: format!("{price:?} is not a decimal number"),
        })?;
    if parsed <= 0.0 {
        return Err(DomainError::InvalidField {
            field: "price",
            message: "price must be greater than zero".to_string(),
        });
    }
    Ok(())
}

const fn default_active() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn input() -> ProductInput {
        ProductInput {
            name: "Widget".to_string(),
            description: String::new(),
            price: "9.99".to_string(),
            quantity: 5,
            is_active: true,
        }
    }

    #[test]
    fn test_product_deserializes_decimal_price() {
        let product: Product = serde_json::from_str(
            r#"{"id": 1, "name": "Widget", "description": "", "price": "12.50", "quantity": 3, "is_active": true}"#,
        )
        .unwrap();
        assert_eq!(product.price, "12.50");
        assert_eq!(product.quantity, 3);
    }

    #[test]
    fn test_input_validation() {
        assert!(input().validate().is_ok());

        let mut bad = input();
        bad.name = " a ".to_string();
        assert!(matches!(bad.validate(), Err(DomainError::InvalidField { field: "name", .. })));

        let mut bad = input();
        bad.price = "0".to_string();
        assert!(matches!(bad.validate(), Err(DomainError::InvalidField { field: "price", .. })));

        let mut bad = input();
        bad.price = "ten".to_string();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = ProductPatch {
            quantity: Some(10),
            ..ProductPatch::default()
        };
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"quantity":10}"#);
    }
}
