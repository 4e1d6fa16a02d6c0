//! Serde helpers for FHIR `instant` timestamps.
//!
//! Generated data renders every timestamp in UTC with second precision and a literal `Z`
//! suffix, e.g. `2023-07-14T09:31:02Z`. Reading accepts any RFC 3339 timestamp and
//! normalises it to UTC.
//!
//! Use with `#[serde(with = "crate::instant")]` on `DateTime<Utc>` fields and
//! `#[serde(with = "crate::instant::option")]` on `Option<DateTime<Utc>>` fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// `strftime` pattern for rendered instants.
pub const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Render a timestamp in the fixed `YYYY-MM-DDTHH:MM:SSZ` form.
pub fn format_instant(value: &DateTime<Utc>) -> String {
    value.format(INSTANT_FORMAT).to_string()
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_instant(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).map(|dt| dt.with_timezone(&Utc))
}

pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_instant(value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_instant(&text).map_err(serde::de::Error::custom)
}

/// Variant for optional timestamps; `None` renders as `null`.
pub mod option {
    use super::*;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&format_instant(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = Option::<String>::deserialize(deserializer)?;
        text.map(|t| parse_instant(&t).map_err(serde::de::Error::custom))
            .transpose()
    }
}
