//! Typed export records.
//!
//! An export record is exactly one of three kinds.  Each kind is validated
//! at load time: timestamps normalized to UTC, points decoded into
//! [`GeoPoint`]s.

use serde::{Serialize, Serializer};

use lh_core::{CoreError, GeoPoint, Timestamp};

/// One slot of a timeline path.
///
/// A slot that fails to decode keeps its place: dropping it would make its
/// two neighbours look adjacent.
#[derive(Clone, Debug, PartialEq)]
pub enum PathPoint {
    Valid(GeoPoint),
    Malformed { text: String, error: CoreError },
}

impl PathPoint {
    pub fn parse(text: &str) -> Self {
        match GeoPoint::parse(text) {
            Ok(point) => PathPoint::Valid(point),
            Err(error) => PathPoint::Malformed { text: text.to_owned(), error },
        }
    }

    /// The text this slot was decoded from.
    pub fn encoded(&self) -> &str {
        match self {
            PathPoint::Valid(p) => p.encoded(),
            PathPoint::Malformed { text, .. } => text,
        }
    }

    pub fn valid(&self) -> Option<&GeoPoint> {
        match self {
            PathPoint::Valid(p) => Some(p),
            PathPoint::Malformed { .. } => None,
        }
    }

    /// The decode error, for a malformed slot.
    pub fn error(&self) -> Option<&CoreError> {
        match self {
            PathPoint::Valid(_) => None,
            PathPoint::Malformed { error, .. } => Some(error),
        }
    }
}

impl From<GeoPoint> for PathPoint {
    fn from(point: GeoPoint) -> Self {
        PathPoint::Valid(point)
    }
}

/// Both variants serialize as their original text.
impl Serialize for PathPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.encoded())
    }
}

/// One position on a tracked timeline path.
///
/// `time` is the owning timeline record's start time; every point of one
/// path shares it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelinePoint {
    #[serde(with = "lh_core::time::iso")]
    pub time:  Timestamp,
    pub point: PathPoint,
}

/// A recorded dwell location.  Passed through to the output, never routed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VisitPoint {
    #[serde(with = "lh_core::time::iso")]
    pub time:  Timestamp,
    pub point: GeoPoint,
}

/// A declared point-to-point movement.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivityRecord {
    pub start_time:    Timestamp,
    pub end_time:      Timestamp,
    /// Declared travel type, verbatim (`"walking"`, `"in passenger vehicle"`…).
    pub activity_type: String,
    pub start:         GeoPoint,
    pub end:           GeoPoint,
}

/// A tracked path: a run of positions sharing one time span.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineRecord {
    pub start_time: Timestamp,
    pub end_time:   Timestamp,
    /// Every slot of the path, malformed ones included, in path order.
    pub path:       Vec<PathPoint>,
}

/// A dwell at one place.
#[derive(Clone, Debug, PartialEq)]
pub struct VisitRecord {
    pub start_time: Timestamp,
    pub end_time:   Timestamp,
    pub place:      GeoPoint,
}

/// A validated export record.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    Timeline(TimelineRecord),
    Activity(ActivityRecord),
    Visit(VisitRecord),
}

impl Record {
    pub fn start_time(&self) -> Timestamp {
        match self {
            Record::Timeline(t) => t.start_time,
            Record::Activity(a) => a.start_time,
            Record::Visit(v)    => v.start_time,
        }
    }

    pub fn end_time(&self) -> Timestamp {
        match self {
            Record::Timeline(t) => t.end_time,
            Record::Activity(a) => a.end_time,
            Record::Visit(v)    => v.end_time,
        }
    }

    /// Short kind name for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Record::Timeline(_) => "timeline",
            Record::Activity(_) => "activity",
            Record::Visit(_)    => "visit",
        }
    }
}
