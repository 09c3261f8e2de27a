//! Timestamps.
//!
//! Exports stamp records with ISO-8601 strings carrying either a `Z` or an
//! explicit UTC offset (`2024-03-02T08:15:00.000+01:00`).  Every timestamp is
//! normalized to a UTC-naive [`Timestamp`] at the input boundary so that
//! window filtering and chronological sorting compare like with like.

use chrono::{DateTime, NaiveDateTime};

use crate::{CoreError, CoreResult};

/// A UTC instant without an attached zone.
pub type Timestamp = NaiveDateTime;

/// Layout accepted for offset-free input.
const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Layout of every timestamp written out: always millisecond precision,
/// the same shape as export timestamps with the offset removed.
const OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Parse an ISO-8601 timestamp and normalize it to UTC.
///
/// Strings without an offset are taken to already be UTC.
pub fn parse_timestamp(text: &str) -> CoreResult<Timestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(text, NAIVE_FORMAT).map_err(|e| CoreError::MalformedTimestamp {
        text:   text.to_owned(),
        reason: e.to_string(),
    })
}

/// Render as `YYYY-MM-DDTHH:MM:SS.sss`.
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.format(OUTPUT_FORMAT).to_string()
}

/// `#[serde(with = "lh_core::time::iso")]` adapter for [`Timestamp`] fields.
#[cfg(feature = "serde")]
pub mod iso {
    use super::{Timestamp, format_timestamp, parse_timestamp};

    pub fn serialize<S: serde::Serializer>(ts: &Timestamp, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format_timestamp(ts))
    }

    pub fn deserialize<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Timestamp, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(d)?;
        parse_timestamp(&text).map_err(serde::de::Error::custom)
    }
}
