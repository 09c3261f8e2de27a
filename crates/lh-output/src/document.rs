//! Output document layout.
//!
//! ```json
//! {
//!   "routes":          [ { "type", "time", "start", "end", "coords": [[lat, lon], ...] } ],
//!   "routes_timeline": [ ... same shape ... ],
//!   "timeline":        [ { "time", "point" } ],
//!   "visits":          [ { "time", "point" } ]
//! }
//! ```

use serde::Serialize;

use lh_core::{GeoPoint, Timestamp};
use lh_input::{TimelinePoint, VisitPoint};
use lh_routing::Route;

/// One route as written out.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteRecord {
    #[serde(rename = "type")]
    pub kind:   String,
    #[serde(with = "lh_core::time::iso")]
    pub time:   Timestamp,
    pub start:  GeoPoint,
    pub end:    GeoPoint,
    pub coords: Vec<[f64; 2]>,
}

impl From<&Route> for RouteRecord {
    fn from(route: &Route) -> Self {
        Self {
            kind:   route.label.clone(),
            time:   route.time,
            start:  route.start.clone(),
            end:    route.end.clone(),
            coords: route.coords.iter().map(|c| [c.lat, c.lon]).collect(),
        }
    }
}

/// The complete document.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct OutputDocument {
    /// Routes for declared activities.
    pub routes:          Vec<RouteRecord>,
    /// Routes between consecutive timeline points.
    pub routes_timeline: Vec<RouteRecord>,
    pub timeline:        Vec<TimelinePoint>,
    pub visits:          Vec<VisitPoint>,
}

impl OutputDocument {
    /// Assemble a document.  Route sets arrive unordered from the scheduler
    /// and are sorted by `(time, start, end)` so that identical runs write
    /// identical files.  `timeline` and `visits` keep their given order.
    pub fn new(
        routes:          &[Route],
        routes_timeline: &[Route],
        timeline:        Vec<TimelinePoint>,
        visits:          Vec<VisitPoint>,
    ) -> Self {
        Self {
            routes: sorted_records(routes),
            routes_timeline: sorted_records(routes_timeline),
            timeline,
            visits,
        }
    }
}

fn sorted_records(routes: &[Route]) -> Vec<RouteRecord> {
    let mut records: Vec<RouteRecord> = routes.iter().map(RouteRecord::from).collect();
    records.sort_by(|a, b| {
        (a.time, a.start.encoded(), a.end.encoded(), &a.kind)
            .cmp(&(b.time, b.start.encoded(), b.end.encoded(), &b.kind))
    });
    records
}
