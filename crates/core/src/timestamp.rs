//! ISO-8601 timestamp handling at the storage/transport boundary.
//!
//! Stored documents carry timestamps as loosely-typed JSON. Reading them never
//! fails a request: absent or unparsable values are replaced with the current
//! time and logged.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::Value;

/// Formats an instant the way every API response carries it
/// (`2024-01-31T08:15:00.000Z`).
#[must_use]
pub fn to_iso(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a timestamp string: RFC 3339 first, then a zone-less ISO form
/// interpreted as UTC.
#[must_use]
pub fn parse_iso(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Converts a stored JSON timestamp into an instant.
///
/// Strings are parsed as ISO-8601, integers as epoch milliseconds.
#[must_use]
pub fn from_json(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_iso(s),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}

/// Normalizes an optional stored timestamp, substituting `now` when it is
/// absent or malformed.
#[must_use]
pub fn normalize(value: Option<&Value>, field: &'static str, now: DateTime<Utc>) -> DateTime<Utc> {
    match value {
        Some(v) => from_json(v).unwrap_or_else(|| {
            tracing::warn!(field, value = %v, "malformed timestamp in document, using current time");
            now
        }),
        None => {
            tracing::debug!(field, "timestamp missing in document, using current time");
            now
        },
    }
}

/// Serde adapter serializing `DateTime<Utc>` as millisecond ISO strings.
pub mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_iso(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_iso(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}")))
    }
}
