//! Stockroom Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration loading.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod serialization;

pub use adapters::ReqwestTransport;
pub use config::{ClientConfig, ConfigError, DEFAULT_BASE_URL};
pub use persistence::{FileTokenStorage, MemoryTokenStorage};
pub use serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};
