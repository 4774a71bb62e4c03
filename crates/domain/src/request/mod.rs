//! Outbound request types

mod method;
mod pending;

pub use method::HttpMethod;
pub use pending::PendingRequest;
