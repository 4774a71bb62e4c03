//! Stockroom Domain - Core business types
//!
//! This crate defines the domain model for the Stockroom inventory client:
//! session credentials and claims, user profiles and locations, the
//! inventory resources exposed by the backend, and the query/pagination
//! shapes used to list them. All types here are pure Rust with no I/O.

pub mod auth;
pub mod error;
pub mod filters;
pub mod inventory;
pub mod pagination;
pub mod request;
pub mod response;
mod serde_helpers;

pub use auth::{
    AccessScope, AuthError, ClaimsError, NewUser, PasswordChange, ProfileDetails, ProfileUpdate,
    RefreshedTokens, Role, SessionUser, TokenPair, UserProfile,
};
pub use error::{DomainError, DomainResult};
pub use filters::{MovementFilters, ProductFilters, QueryParams};
pub use inventory::{
    InventoryMovement, InventoryReport, Location, LocationId, LocationInput, MovementInput,
    MovementType, Product, ProductId, ProductInput, ProductPatch, PurchaseOrder,
    PurchaseOrderInput, PurchaseOrderItem, PurchaseOrderItemInput, PurchaseOrderStatus,
    Supplier, SupplierInput,
};
pub use pagination::{ListResponse, Page};
pub use request::{HttpMethod, PendingRequest};
pub use response::{ErrorBody, ErrorKind, StatusCode};
