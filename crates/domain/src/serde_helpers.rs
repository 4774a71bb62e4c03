//! Lenient deserializers for identifiers.
//!
//! The backend sends numeric primary keys, but some fields (token subject
//! claims, form-submitted foreign keys) arrive as strings or empty strings.

use serde::{Deserialize, Deserializer, de::Error as _};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

fn parse_text<E: serde::de::Error>(text: &str) -> Result<Option<i64>, E> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| E::custom(format!("expected a numeric id, got {text:?}")))
}

/// Deserializes a required id given as a number or a numeric string.
pub fn id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n),
        RawId::Text(text) => {
            parse_text::<D::Error>(&text)?.ok_or_else(|| D::Error::custom("empty id"))
        }
    }
}

/// Deserializes an optional id; `null` and `""` both mean "none".
pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Number(n)) => Ok(Some(n)),
        Some(RawId::Text(text)) => parse_text::<D::Error>(&text),
    }
}
