//! Distance-based travel mode for timeline transitions.
//!
//! A transition is the movement between two chronologically adjacent
//! timeline positions.  It is labelled by straight-line distance alone: a
//! crude heuristic, kept as-is.

use lh_core::{TravelMode, straight_line_distance_km};
use lh_input::{PathPoint, TimelinePoint};

use crate::request::TravelRequest;
use crate::RouteError;

/// Transitions strictly longer than this are driven; the rest are walked.
pub const DRIVING_THRESHOLD_KM: f64 = 1.0;

/// Mode for a straight-line distance.  Exactly the threshold is walked.
#[inline]
pub fn mode_for_distance(distance_km: f64) -> TravelMode {
    if distance_km > DRIVING_THRESHOLD_KM {
        TravelMode::Driving
    } else {
        TravelMode::Walking
    }
}

/// Request for the movement from `a` to `b`, stamped with `a`'s time.
///
/// # Errors
///
/// A `MalformedInput` [`RouteError`] if either slot failed to decode; no
/// mode can be chosen without both positions.
pub fn classify(a: &TimelinePoint, b: &TimelinePoint) -> Result<TravelRequest, RouteError> {
    let (start, end) = match (&a.point, &b.point) {
        (PathPoint::Valid(start), PathPoint::Valid(end)) => (start, end),
        (PathPoint::Malformed { error, .. }, _) | (_, PathPoint::Malformed { error, .. }) => {
            return Err(RouteError::malformed(a.time, &a.point, &b.point, error.clone()));
        }
    };
    let mode = mode_for_distance(straight_line_distance_km(start, end));
    Ok(TravelRequest::classified(mode, a.time, start.clone(), end.clone()))
}

/// Transitions of a flattened timeline.
///
/// `requests` are ready to route; `rejected` failed before routing.  Every
/// adjacent pair lands in exactly one of the two.
#[derive(Debug, Default)]
pub struct Transitions {
    pub requests: Vec<TravelRequest>,
    pub rejected: Vec<RouteError>,
}

impl Transitions {
    /// Number of adjacent pairs.
    pub fn len(&self) -> usize {
        self.requests.len() + self.rejected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classify every adjacent pair of `points`.
pub fn transitions(points: &[TimelinePoint]) -> Transitions {
    let mut out = Transitions::default();
    for w in points.windows(2) {
        match classify(&w[0], &w[1]) {
            Ok(req) => out.requests.push(req),
            Err(e) => out.rejected.push(e),
        }
    }
    out
}
