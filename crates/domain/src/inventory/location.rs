//! Stock locations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Primary key of a location.
pub type LocationId = i64;

/// A warehouse or store holding stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Location id.
    #[serde(deserialize_with = "crate::serde_helpers::id")]
    pub id: LocationId,
    /// Unique display name.
    pub name: String,
    /// Postal address.
    #[serde(default)]
    pub address: String,
    /// Inactive locations are kept for history only.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Create/update payload for a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationInput {
    /// Unique display name.
    pub name: String,
    /// Postal address.
    #[serde(default)]
    pub address: String,
    /// Whether the location is in use.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}
