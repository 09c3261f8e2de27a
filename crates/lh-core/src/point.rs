//! Encoded points: `"<label>:<lat>,<lon>"`.
//!
//! Location exports carry every position as a string such as
//! `"geo:38.722300,-9.139300"`.  A [`GeoPoint`] is decoded exactly once at the
//! input boundary and passed by value (or reference) from then on; it keeps
//! the original text so routes can echo their endpoints verbatim.

use std::str::FromStr;

use crate::{Coord, CoreError, CoreResult};

/// A decoded, labelled position.  Immutable after [`GeoPoint::parse`].
#[derive(Clone, Debug, PartialEq)]
pub struct GeoPoint {
    encoded: String,
    label:   String,
    coord:   Coord,
}

impl GeoPoint {
    /// Decode `text`.
    ///
    /// The label is everything before the first `:`.  The remainder must be
    /// exactly two comma-separated finite decimals, `lat` then `lon`, inside
    /// the WGS-84 ranges.
    pub fn parse(text: &str) -> CoreResult<Self> {
        let (label, rest) = text
            .split_once(':')
            .ok_or_else(|| CoreError::point(text, "missing ':' separator"))?;

        let mut parts = rest.split(',');
        let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(CoreError::point(text, "expected exactly two comma-separated components"));
        };

        let coord = Coord::new(parse_component(text, lat)?, parse_component(text, lon)?);
        if !coord.in_range() {
            return Err(CoreError::point(text, "coordinate out of range"));
        }

        Ok(Self {
            encoded: text.to_owned(),
            label:   label.to_owned(),
            coord,
        })
    }

    /// The text this point was decoded from.
    #[inline]
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn coord(&self) -> Coord {
        self.coord
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.coord.lat
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.coord.lon
    }
}

fn parse_component(text: &str, component: &str) -> CoreResult<f64> {
    let value: f64 = component
        .trim()
        .parse()
        .map_err(|_| CoreError::point(text, "component is not a number"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoreError::point(text, "component is not finite"))
    }
}

/// Great-circle distance between two points, in kilometres.
pub fn straight_line_distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    a.coord.distance_m(b.coord) / 1_000.0
}

impl FromStr for GeoPoint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GeoPoint::parse(s)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encoded)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for GeoPoint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encoded)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for GeoPoint {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        GeoPoint::parse(&text).map_err(serde::de::Error::custom)
    }
}
