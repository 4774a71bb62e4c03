//! Typed wrappers over the backend's resource endpoints.
//!
//! Each service is a thin, cheaply cloneable handle on the shared
//! [`ApiClient`](crate::ApiClient); authentication and refresh happen there.

mod locations;
mod movements;
mod products;
mod purchase_orders;
mod reports;
mod suppliers;
mod users;

pub use locations::LocationService;
pub use movements::MovementService;
pub use products::ProductService;
pub use purchase_orders::PurchaseOrderService;
pub use reports::ReportService;
pub use suppliers::SupplierService;
pub use users::UserAdminService;
