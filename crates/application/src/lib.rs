//! Stockroom Application - Authenticated API client and services
//!
//! This crate defines the application layer with:
//! - Port traits for the HTTP transport, token storage, and clock
//! - The session store and single-flight token refresh
//! - The API client that replays a request once after a 401
//! - The auth context and typed services for each backend resource

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod fetch;
pub mod ports;
pub mod services;
pub mod session;

#[cfg(test)]
mod test_support;

pub use auth::{AuthContext, LogoutOutcome};
pub use client::{ApiClient, ApiResponse, RequestOptions};
pub use error::{ApiResult, HttpError};
pub use fetch::{LatestRequest, SearchOutcome, SuggestionSearch, cancellable};
pub use ports::{
    Clock, HttpTransport, StorageError, SystemClock, TokenStorage, TransportError,
    TransportRequest, TransportResponse,
};
pub use services::{
    LocationService, MovementService, ProductService, PurchaseOrderService, ReportService,
    SupplierService, UserAdminService,
};
pub use session::{LogoutReason, RefreshCoordinator, SessionEvent, SessionStatus, SessionStore};
pub use tokio_util::sync::CancellationToken;
