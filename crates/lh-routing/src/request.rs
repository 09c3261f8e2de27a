//! Travel requests in, routes out.

use std::fmt;

use lh_core::{Coord, GeoPoint, Timestamp, TravelMode, format_timestamp};
use lh_input::ActivityRecord;

/// One point-to-point movement to be routed.
#[derive(Clone, Debug, PartialEq)]
pub struct TravelRequest {
    /// Route `type` written to the output: the declared activity type, or
    /// the classifier's label.
    pub label: String,
    pub mode:  TravelMode,
    pub time:  Timestamp,
    pub start: GeoPoint,
    pub end:   GeoPoint,
}

impl TravelRequest {
    /// Request for a declared activity.  The mode is derived from the
    /// declared type; the type itself is kept verbatim as the label.
    pub fn from_activity(activity: &ActivityRecord) -> Self {
        Self {
            label: activity.activity_type.clone(),
            mode:  TravelMode::from_activity_type(&activity.activity_type),
            time:  activity.start_time,
            start: activity.start.clone(),
            end:   activity.end.clone(),
        }
    }

    /// Request with a classifier-assigned mode, labelled by that mode.
    pub fn classified(mode: TravelMode, time: Timestamp, start: GeoPoint, end: GeoPoint) -> Self {
        Self { label: mode.label().to_owned(), mode, time, start, end }
    }
}

impl fmt::Display for TravelRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} at {} from {} to {}",
            self.label,
            format_timestamp(&self.time),
            self.start,
            self.end
        )
    }
}

/// A network-snapped route.
///
/// `label`, `time`, `start` and `end` are copied from the request unchanged;
/// they are the only way to match a route back to its request.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub label:  String,
    pub mode:   TravelMode,
    pub time:   Timestamp,
    pub start:  GeoPoint,
    pub end:    GeoPoint,
    /// Node coordinates from the snapped start to the snapped end.
    /// Never empty.
    pub coords: Vec<Coord>,
}
