//! Inventory resources exposed by the backend.

mod location;
mod movement;
mod product;
mod purchase_order;
mod report;
mod supplier;

pub use location::{Location, LocationId, LocationInput};
pub use movement::{InventoryMovement, MovementInput, MovementType};
pub use product::{Product, ProductId, ProductInput, ProductPatch};
pub use purchase_order::{
    PurchaseOrder, PurchaseOrderInput, PurchaseOrderItem, PurchaseOrderItemInput,
    PurchaseOrderStatus,
};
pub use report::{InventoryReport, MonthlySales, StockLevel, TopProduct};
pub use supplier::{Supplier, SupplierInput};
