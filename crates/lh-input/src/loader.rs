//! JSON export loader.
//!
//! # Export format
//!
//! A top-level JSON array; each element carries `startTime`/`endTime` and
//! exactly one payload key:
//!
//! ```json
//! [
//!   { "startTime": "2024-03-02T08:00:00.000Z", "endTime": "2024-03-02T10:00:00.000Z",
//!     "timelinePath": [ { "point": "geo:38.7223,-9.1393" }, { "point": "geo:38.7231,-9.1402" } ] },
//!   { "startTime": "2024-03-02T10:00:00.000Z", "endTime": "2024-03-02T10:20:00.000Z",
//!     "activity": { "start": "geo:38.7231,-9.1402", "end": "geo:38.7370,-9.1550",
//!                   "topCandidate": { "type": "walking" } } },
//!   { "startTime": "2024-03-02T10:20:00.000Z", "endTime": "2024-03-02T12:00:00.000Z",
//!     "visit": { "topCandidate": { "placeLocation": "geo:38.7370,-9.1550" } } }
//! ]
//! ```
//!
//! Records are kept iff `startTime > window.start` and `endTime < window.end`
//! (both strict).  A record that cannot be decoded is skipped and counted in
//! the [`LoadReport`]; only a document that is not an array is fatal.  A
//! bad point inside a timeline path does not drop the record: the slot is
//! kept as [`PathPoint::Malformed`].

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use lh_core::{CoreError, GeoPoint, Timestamp, parse_timestamp};

use crate::record::{ActivityRecord, PathPoint, Record, TimelinePoint, TimelineRecord, VisitPoint, VisitRecord};
use crate::{InputError, InputResult};

// ── Raw JSON shapes ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    start_time:    String,
    end_time:      String,
    timeline_path: Option<Vec<RawPathPoint>>,
    activity:      Option<RawActivity>,
    visit:         Option<RawVisit>,
}

#[derive(Deserialize)]
struct RawPathPoint {
    point: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawActivity {
    start:         String,
    end:           String,
    top_candidate: RawActivityCandidate,
}

#[derive(Deserialize)]
struct RawActivityCandidate {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVisit {
    top_candidate: RawVisitCandidate,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVisitCandidate {
    place_location: String,
}

// ── Public types ──────────────────────────────────────────────────────────────

/// Time window a record must fall strictly inside.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Window {
    pub start: Timestamp,
    pub end:   Timestamp,
}

impl Window {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    /// `start_time > self.start && end_time < self.end`.
    #[inline]
    pub fn admits(&self, start_time: Timestamp, end_time: Timestamp) -> bool {
        start_time > self.start && end_time < self.end
    }
}

/// What happened to each record of the export.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Array elements in the document.
    pub total:              usize,
    pub timeline_records:   usize,
    pub activity_records:   usize,
    pub visit_records:      usize,
    /// Well-formed records outside the window.
    pub outside_window:     usize,
    /// Records with none of the known payload keys.
    pub unrecognized:       usize,
    /// Records dropped for a missing field, bad timestamp, or bad point.
    pub malformed_records:  usize,
    /// Timeline positions with a bad point encoding.  They stay in the
    /// timeline; transitions touching them fail as malformed input.
    pub malformed_points:   usize,
}

impl std::fmt::Display for LoadReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} records: {} timeline, {} visits, {} activities \
             ({} outside window, {} unrecognized, {} malformed, {} bad timeline points)",
            self.total,
            self.timeline_records,
            self.visit_records,
            self.activity_records,
            self.outside_window,
            self.unrecognized,
            self.malformed_records,
            self.malformed_points,
        )
    }
}

/// A loaded export, partitioned by record kind.
#[derive(Clone, Debug, Default)]
pub struct Export {
    /// Flattened timeline positions, ordered by owning record start time.
    pub timeline:   Vec<TimelinePoint>,
    /// Activities in document order.
    pub activities: Vec<ActivityRecord>,
    /// Visits in document order.
    pub visits:     Vec<VisitPoint>,
    pub report:     LoadReport,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load and partition the export at `path`.
pub fn load_export(path: &Path, window: &Window) -> InputResult<Export> {
    let file = File::open(path)?;
    load_export_reader(BufReader::new(file), window)
}

/// Like [`load_export`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`).
pub fn load_export_reader<R: Read>(reader: R, window: &Window) -> InputResult<Export> {
    let doc: serde_json::Value = serde_json::from_reader(reader)?;
    let serde_json::Value::Array(items) = doc else {
        return Err(InputError::InputFormat(
            "top-level document must be a JSON array of records".into(),
        ));
    };

    let mut report = LoadReport { total: items.len(), ..LoadReport::default() };
    let mut records = Vec::with_capacity(items.len());

    for (i, item) in items.into_iter().enumerate() {
        let raw: RawRecord = match serde_json::from_value(item) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("record {i}: skipped: {e}");
                report.malformed_records += 1;
                continue;
            }
        };

        match validate(raw, window, &mut report) {
            Ok(Some(record)) => {
                log::trace!("record {i}: {} starting {}", record.kind(), record.start_time());
                records.push(record);
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!("record {i}: skipped: {e}");
                report.malformed_records += 1;
            }
        }
    }

    Ok(partition(records, report))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Decode one raw record.  `Ok(None)` means filtered out or unrecognized;
/// the report has already been updated for those.
fn validate(raw: RawRecord, window: &Window, report: &mut LoadReport) -> Result<Option<Record>, CoreError> {
    let start_time = parse_timestamp(&raw.start_time)?;
    let end_time = parse_timestamp(&raw.end_time)?;

    if !window.admits(start_time, end_time) {
        report.outside_window += 1;
        return Ok(None);
    }

    let record = if let Some(path) = raw.timeline_path {
        let points: Vec<PathPoint> = path.iter().map(|p| PathPoint::parse(&p.point)).collect();
        for error in points.iter().filter_map(PathPoint::error) {
            log::warn!("timeline point kept as malformed: {error}");
            report.malformed_points += 1;
        }
        Record::Timeline(TimelineRecord { start_time, end_time, path: points })
    } else if let Some(activity) = raw.activity {
        Record::Activity(ActivityRecord {
            start_time,
            end_time,
            activity_type: activity.top_candidate.kind,
            start: GeoPoint::parse(&activity.start)?,
            end: GeoPoint::parse(&activity.end)?,
        })
    } else if let Some(visit) = raw.visit {
        Record::Visit(VisitRecord {
            start_time,
            end_time,
            place: GeoPoint::parse(&visit.top_candidate.place_location)?,
        })
    } else {
        report.unrecognized += 1;
        return Ok(None);
    };

    Ok(Some(record))
}

fn partition(records: Vec<Record>, mut report: LoadReport) -> Export {
    let mut timeline_records = Vec::new();
    let mut activities = Vec::new();
    let mut visits = Vec::new();

    for record in records {
        match record {
            Record::Timeline(t) => timeline_records.push(t),
            Record::Activity(a) => activities.push(a),
            Record::Visit(v) => visits.push(VisitPoint { time: v.start_time, point: v.place }),
        }
    }

    report.timeline_records = timeline_records.len();
    report.activity_records = activities.len();
    report.visit_records = visits.len();

    // Stable: records sharing a start time keep document order.
    timeline_records.sort_by_key(|t| t.start_time);
    let timeline = timeline_records
        .into_iter()
        .flat_map(|t| {
            let time = t.start_time;
            t.path.into_iter().map(move |point| TimelinePoint { time, point })
        })
        .collect();

    Export { timeline, activities, visits, report }
}
