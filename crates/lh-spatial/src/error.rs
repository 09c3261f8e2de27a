//! Spatial-subsystem error type.

use thiserror::Error;

use lh_core::{Coord, NodeId};

/// Errors produced by `lh-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no path from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("cannot snap non-finite point {0}")]
    InvalidPoint(Coord),

    #[error("network has no nodes")]
    EmptyNetwork,

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
