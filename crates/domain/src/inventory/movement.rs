//! Stock movements

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

use super::{LocationId, ProductId};

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementType {
    /// Goods received.
    #[serde(rename = "IN")]
    In,
    /// Goods shipped or sold.
    #[serde(rename = "OUT")]
    Out,
    /// Stock count correction.
    #[serde(rename = "ADJ")]
    Adjustment,
}

impl MovementType {
    /// Returns the wire code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
            Self::Adjustment => "ADJ",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementType {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.to_uppercase().as_str() {
            "IN" => Ok(Self::In),
            "OUT" => Ok(Self::Out),
            "ADJ" => Ok(Self::Adjustment),
            other => Err(DomainError::InvalidField {
                field: "movement_type",
                message: format!("unknown movement type {other:?}"),
            }),
        }
    }
}

/// A logged change in stock for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryMovement {
    /// Movement id.
    #[serde(deserialize_with = "crate::serde_helpers::id")]
    pub id: i64,
    /// Product affected.
    #[serde(deserialize_with = "crate::serde_helpers::id")]
    pub product: ProductId,
    /// Product name, denormalized by the backend.
    #[serde(default)]
    pub product_name: String,
    /// Units moved.
    pub quantity: i64,
    /// Direction.
    pub movement_type: MovementType,
    /// When the movement was recorded.
    pub date: DateTime<Utc>,
    /// Location where it happened.
    #[serde(default, deserialize_with = "crate::serde_helpers::opt_id")]
    pub location: Option<LocationId>,
}

/// Payload to record a movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovementInput {
    /// Product affected.
    pub product: ProductId,
    /// Units moved, greater than zero.
    pub quantity: i64,
    /// Direction.
    pub movement_type: MovementType,
    /// Location where it happened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationId>,
}

impl MovementInput {
    /// Rejects non-positive quantities.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidField` when `quantity <= 0`.
    pub fn validate(&self) -> DomainResult<()> {
        if self.quantity <= 0 {
            return Err(DomainError::InvalidField {
                field: "quantity",
                message: "quantity must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
