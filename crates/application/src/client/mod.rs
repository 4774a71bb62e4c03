//! Bearer-token API client.

mod api_client;
mod options;

pub use api_client::ApiClient;
pub use options::{ApiResponse, RequestOptions};
