//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait implemented by an adapter in the infrastructure layer.

mod clock;
mod http_transport;
mod token_storage;

pub use clock::{Clock, SystemClock};
pub use http_transport::{HttpTransport, TransportError, TransportRequest, TransportResponse};
pub use token_storage::{StorageError, TokenStorage, TOKEN_STORAGE_KEY};
