//! Timestamp codec
//!
//! The host reports `timestamptz` columns either as RFC 3339 or in the
//! PostgreSQL text form (`2024-01-01 00:00:00+00`). Both are accepted; output
//! is always RFC 3339 with the original offset kept.

use chrono::{DateTime, FixedOffset, SecondsFormat};

use crate::errors::{PlanError, Result};

pub type Timestamp = DateTime<FixedOffset>;

/// # Errors
/// Returns `PlanError::SchemaValidation` when the text has no recognisable
/// date, time and offset.
pub fn parse_timestamp(text: &str) -> Result<Timestamp> {
    let trimmed = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed);
    }

    let normalized = normalize(trimmed);
    DateTime::parse_from_rfc3339(&normalized)
        .map_err(|e| PlanError::SchemaValidation(format!("invalid timestamp '{text}': {e}")))
}

pub fn format_timestamp(timestamp: &Timestamp) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Rewrite the PostgreSQL text form into RFC 3339.
fn normalize(text: &str) -> String {
    let mut out = text.replacen(' ', "T", 1);
    if out.ends_with(['z', 'Z']) {
        return out;
    }

    // `+HH` short offsets become `+HH:00`.
    let offset_start = out.rfind(['+', '-']).filter(|i| *i > "YYYY-MM-DDTHH".len());
    if let Some(start) = offset_start {
        let offset = &out[start + 1..];
        if offset.len() == 2 && offset.bytes().all(|b| b.is_ascii_digit()) {
            out.push_str(":00");
        } else if offset.len() == 4 && offset.bytes().all(|b| b.is_ascii_digit()) {
            out.insert(start + 3, ':');
        }
    }
    out
}

/// Serde adapter for `Timestamp` fields.
pub mod serde_timestamp {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{format_timestamp, parse_timestamp, Timestamp};

    pub fn serialize<S: Serializer>(value: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_timestamp(&text).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `Option<Timestamp>` fields.
pub mod serde_timestamp_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{format_timestamp, parse_timestamp, Timestamp};

    pub fn serialize<S: Serializer>(
        value: &Option<Timestamp>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.serialize_some(&format_timestamp(value)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Timestamp>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| parse_timestamp(&text).map_err(serde::de::Error::custom))
            .transpose()
    }
}
