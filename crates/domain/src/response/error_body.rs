//! Backend error bodies
//!
//! The backend reports failures in the REST-framework shape:
//! `{"detail": "..."}` for request-level errors and
//! `{"field": ["msg", ...], "non_field_errors": [...]}` for validation errors.
//! Some views answer `{"message": "..."}` or `{"error": "..."}` instead.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

const MESSAGE_KEYS: [&str; 3] = ["detail", "message", "error"];
const NON_FIELD_KEY: &str = "non_field_errors";
const MAX_TEXT_DETAIL: usize = 200;

/// Display category of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The request never got a response.
    Network,
    /// The session is missing, expired, or was rejected.
    Auth,
    /// The backend rejected the input (4xx).
    Validation,
    /// The backend failed (5xx).
    Server,
    /// The client could not build, decode, or finish the call.
    Client,
}

impl ErrorKind {
    /// Returns the snake-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Auth => "auth",
            Self::Validation => "validation",
            Self::Server => "server",
            Self::Client => "client",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed error payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ErrorBody {
    /// Request-level message (`detail`, `message`, or `error`).
    pub detail: Option<String>,
    /// Messages not tied to a field.
    pub non_field_errors: Vec<String>,
    /// Per-field messages.
    pub fields: BTreeMap<String, Vec<String>>,
}

impl ErrorBody {
    /// Parses a response body. Never fails: unknown shapes yield an empty body,
    /// short plain-text bodies become the detail.
    #[must_use]
    pub fn parse(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => Self::from_value(&value),
            Err(_) => Self::from_text(&String::from_utf8_lossy(bytes)),
        }
    }

    /// Builds from an already decoded JSON value.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let mut body = Self::default();
        match value {
            Value::Object(map) => {
                for (key, value) in map {
                    if body.detail.is_none() && MESSAGE_KEYS.contains(&key.as_str()) {
                        if let Some(text) = value.as_str() {
                            body.detail = Some(text.to_string());
                            continue;
                        }
                    }
                    let messages = flatten_messages(value);
                    if messages.is_empty() {
                        continue;
                    }
                    if key == NON_FIELD_KEY {
                        body.non_field_errors.extend(messages);
                    } else {
                        body.fields.insert(key.clone(), messages);
                    }
                }
            }
            Value::Array(_) => body.non_field_errors = flatten_messages(value),
            Value::String(text) => body.detail = Some(text.clone()),
            _ => {}
        }
        body
    }

    fn from_text(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() || text.starts_with('<') || text.len() > MAX_TEXT_DETAIL {
            return Self::default();
        }
        Self {
            detail: Some(text.to_string()),
            ..Self::default()
        }
    }

    /// Whether nothing useful was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.detail.is_none() && self.non_field_errors.is_empty() && self.fields.is_empty()
    }

    /// The single most relevant message: detail, then the first non-field
    /// error, then the first field error as `field: message`.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        if let Some(detail) = &self.detail {
            return Some(detail.clone());
        }
        if let Some(first) = self.non_field_errors.first() {
            return Some(first.clone());
        }
        self.fields
            .iter()
            .find_map(|(field, messages)| messages.first().map(|m| format!("{field}: {m}")))
    }

    /// Messages for one field.
    #[must_use]
    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map_or(&[], Vec::as_slice)
    }
}

fn flatten_messages(value: &Value) -> Vec<String> {
    match value {
        Value::String(text) => vec![text.clone()],
        Value::Array(items) => items.iter().flat_map(flatten_messages).collect(),
        Value::Null => Vec::new(),
        // nested serializer errors
        Value::Object(map) => map
            .iter()
            .flat_map(|(key, inner)| {
                flatten_messages(inner)
                    .into_iter()
                    .map(move |m| format!("{key}: {m}"))
            })
            .collect(),
        other => vec![other.to_string()],
    }
}
