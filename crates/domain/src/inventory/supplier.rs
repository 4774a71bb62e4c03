//! Suppliers

use serde::{Deserialize, Serialize};

/// A vendor products are purchased from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    /// Supplier id.
    #[serde(deserialize_with = "crate::serde_helpers::id")]
    pub id: i64,
    /// Name or business name.
    pub name: String,
    /// Tax identification number, unique per supplier.
    pub tax_id: String,
    /// Phone number.
    #[serde(default)]
    pub phone_number: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Main contact name.
    #[serde(default)]
    pub contact_person: String,
    /// Payment terms in days.
    #[serde(default = "default_payment_terms")]
    pub payment_terms: u32,
}

/// Create/replace payload for a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierInput {
    /// Name or business name.
    pub name: String,
    /// Tax identification number.
    pub tax_id: String,
    /// Phone number.
    #[serde(default)]
    pub phone_number: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Main contact name.
    #[serde(default)]
    pub contact_person: String,
    /// Payment terms in days.
    #[serde(default = "default_payment_terms")]
    pub payment_terms: u32,
}

const fn default_payment_terms() -> u32 {
    30
}
