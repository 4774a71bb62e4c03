//! JSON encoding for files the client writes to disk.

mod json;

pub use json::{SerializationError, from_json_bytes, to_json_stable_bytes};
