//! Response-side types: status codes and backend error bodies.

mod error_body;
mod status;

pub use error_body::{ErrorBody, ErrorKind};
pub use status::StatusCode;
