//! Per-request and per-batch error types.

use std::fmt;

use thiserror::Error;

use lh_core::{CoreError, Timestamp, format_timestamp};
use lh_input::PathPoint;
use lh_spatial::SpatialError;

use crate::request::TravelRequest;

/// Why a single request produced no route.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteErrorKind {
    /// An endpoint failed to decode or could not be snapped.
    MalformedInput,
    /// The snapped endpoints lie in disconnected components.
    NoPathFound,
    /// The selected network has no nodes.
    EmptyNetwork,
}

impl fmt::Display for RouteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RouteErrorKind::MalformedInput => "malformed input",
            RouteErrorKind::NoPathFound    => "no path found",
            RouteErrorKind::EmptyNetwork   => "empty network",
        })
    }
}

/// Label of a transition whose mode could not be decided.
pub const UNCLASSIFIED_LABEL: &str = "unclassified";

/// Underlying cause of a dropped request.
#[derive(Debug, Error)]
pub enum RouteFailure {
    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Point(#[from] CoreError),
}

/// A dropped request: the failure kind, the request's identity, and the
/// cause.
///
/// `time`, `start` and `end` are the same fields a [`Route`](crate::Route)
/// is matched on; endpoints are kept as their encoded text because a
/// malformed point never decoded into a `GeoPoint`.
#[derive(Debug, Error)]
#[error("{kind} for {label:?} at {} from {start} to {end}: {source}", format_timestamp(.time))]
pub struct RouteError {
    pub kind:   RouteErrorKind,
    pub label:  String,
    pub time:   Timestamp,
    pub start:  String,
    pub end:    String,
    #[source]
    pub source: RouteFailure,
}

impl RouteError {
    pub(crate) fn new(request: &TravelRequest, source: SpatialError) -> Self {
        let kind = match &source {
            SpatialError::InvalidPoint(_) => RouteErrorKind::MalformedInput,
            SpatialError::EmptyNetwork    => RouteErrorKind::EmptyNetwork,
            _                             => RouteErrorKind::NoPathFound,
        };
        Self {
            kind,
            label:  request.label.clone(),
            time:   request.time,
            start:  request.start.encoded().to_owned(),
            end:    request.end.encoded().to_owned(),
            source: source.into(),
        }
    }

    /// A transition with at least one endpoint that failed to decode.
    pub(crate) fn malformed(time: Timestamp, start: &PathPoint, end: &PathPoint, source: CoreError) -> Self {
        Self {
            kind:   RouteErrorKind::MalformedInput,
            label:  UNCLASSIFIED_LABEL.to_owned(),
            time,
            start:  start.encoded().to_owned(),
            end:    end.encoded().to_owned(),
            source: source.into(),
        }
    }
}

/// Failures that prevent a batch from running at all.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("max_workers must be at least 1")]
    ZeroWorkers,

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type BatchResult<T> = Result<T, BatchError>;
