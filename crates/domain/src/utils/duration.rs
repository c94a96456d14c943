//! `HH:MM:SS` duration codec
//!
//! Offsets and plan durations travel as interval strings such as `48:00:00`,
//! `-00:30:00` or `00:00:01.25`. Hours are not bounded by 24. A PostgreSQL
//! style day prefix (`1 day 02:00:00`) is accepted on parse and folded into
//! the hour field on format.

use std::fmt;

use chrono::TimeDelta;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{PlanError, Result};

/// Signed offset relative to a plan start or an anchor.
pub type Offset = TimeDelta;

const MICROS_PER_SECOND: i64 = 1_000_000;
const FRACTION_DIGITS: usize = 6;

/// Parse an interval string into a signed offset.
///
/// # Errors
/// Returns `PlanError::SchemaValidation` when the text is not
/// `[-]HH:MM:SS[.ffffff]`, optionally preceded by `N day(s)`.
pub fn parse_offset(text: &str) -> Result<Offset> {
    let invalid = |why: &str| {
        PlanError::SchemaValidation(format!("invalid duration '{text}': {why}"))
    };

    let trimmed = text.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let tokens: Vec<&str> = body.split_whitespace().collect();
    let (days, clock) = match tokens.as_slice() {
        [clock] => (0_i64, *clock),
        [count, unit, clock] if matches!(*unit, "day" | "days") => {
            (parse_digits(count).ok_or_else(|| invalid("bad day count"))?, *clock)
        }
        _ => return Err(invalid("expected HH:MM:SS")),
    };

    let mut fields = clock.split(':');
    let (Some(hours), Some(minutes), Some(seconds), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(invalid("expected HH:MM:SS"));
    };

    let hours = parse_digits(hours).ok_or_else(|| invalid("bad hours"))?;
    if minutes.len() != 2 {
        return Err(invalid("minutes must have two digits"));
    }
    let minutes = parse_digits(minutes).filter(|m| *m < 60).ok_or_else(|| invalid("bad minutes"))?;

    let (whole, fraction) = seconds.split_once('.').unwrap_or((seconds, ""));
    if whole.len() != 2 {
        return Err(invalid("seconds must have two digits"));
    }
    let whole = parse_digits(whole).filter(|s| *s < 60).ok_or_else(|| invalid("bad seconds"))?;
    let micros = parse_fraction(fraction).ok_or_else(|| invalid("bad fractional seconds"))?;

    let total = days
        .checked_mul(24)
        .and_then(|h| h.checked_add(hours))
        .and_then(|h| h.checked_mul(3600))
        .and_then(|s| s.checked_add(minutes * 60 + whole))
        .and_then(|s| s.checked_mul(MICROS_PER_SECOND))
        .and_then(|us| us.checked_add(micros))
        .ok_or_else(|| invalid("out of range"))?;

    Ok(TimeDelta::microseconds(if negative { -total } else { total }))
}

/// Format an offset as `[-]HH:MM:SS[.ffffff]`.
///
/// The fractional part is only written when non-zero and has its trailing
/// zeros trimmed, so whole-second values read back exactly as they were sent.
pub fn format_offset(offset: &Offset) -> String {
    let micros = offset
        .num_microseconds()
        .unwrap_or_else(|| offset.num_seconds().saturating_mul(MICROS_PER_SECOND));
    let sign = if micros < 0 { "-" } else { "" };
    let magnitude = micros.unsigned_abs();
    let total_seconds = magnitude / MICROS_PER_SECOND.unsigned_abs();
    let fraction = magnitude % MICROS_PER_SECOND.unsigned_abs();

    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut out = format!("{sign}{hours:02}:{minutes:02}:{seconds:02}");
    if fraction != 0 {
        let digits = format!("{fraction:0width$}", width = FRACTION_DIGITS);
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

fn parse_digits(text: &str) -> Option<i64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn parse_fraction(text: &str) -> Option<i64> {
    if text.is_empty() {
        return Some(0);
    }
    if text.len() > FRACTION_DIGITS {
        return None;
    }
    let padded = format!("{text:0<width$}", width = FRACTION_DIGITS);
    parse_digits(&padded)
}

/// Non-negative span of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PlanDuration(TimeDelta);

impl PlanDuration {
    /// # Errors
    /// Returns `PlanError::SchemaValidation` for negative spans.
    pub fn new(span: TimeDelta) -> Result<Self> {
        if span < TimeDelta::zero() {
            return Err(PlanError::SchemaValidation(format!(
                "plan duration must be non-negative, got {}",
                format_offset(&span)
            )));
        }
        Ok(Self(span))
    }

    /// # Errors
    /// Returns `PlanError::SchemaValidation` for malformed or negative input.
    pub fn parse(text: &str) -> Result<Self> {
        Self::new(parse_offset(text)?)
    }

    pub const fn as_delta(&self) -> TimeDelta {
        self.0
    }
}

impl fmt::Display for PlanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_offset(&self.0))
    }
}

impl Serialize for PlanDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_offset(&self.0))
    }
}

impl<'de> Deserialize<'de> for PlanDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `Offset` fields, e.g. `#[serde(with = "serde_offset")]`.
pub mod serde_offset {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{format_offset, parse_offset, Offset};

    pub fn serialize<S: Serializer>(offset: &Offset, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_offset(offset))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Offset, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_offset(&text).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `Option<Offset>` fields.
pub mod serde_offset_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{format_offset, parse_offset, Offset};

    pub fn serialize<S: Serializer>(
        offset: &Option<Offset>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match offset {
            Some(offset) => serializer.serialize_some(&format_offset(offset)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Offset>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| parse_offset(&text).map_err(serde::de::Error::custom))
            .transpose()
    }
}
