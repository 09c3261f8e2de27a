//! `lh-core`: foundational types for the `lochist` route snapper.
//!
//! This crate is a dependency of every other `lh-*` crate.  It has no `lh-*`
//! dependencies and only `chrono` and `thiserror` externally, plus optional
//! `serde`.
//!
//! # What lives here
//!
//! | Module        | Contents                                               |
//! |---------------|--------------------------------------------------------|
//! | [`ids`]       | `NodeId`, `EdgeId`                                     |
//! | [`geo`]       | `Coord`, haversine distance                            |
//! | [`point`]     | `GeoPoint` and the `label:lat,lon` codec               |
//! | [`mode`]      | `TravelMode` and route type labels                     |
//! | [`time`]      | `Timestamp`, ISO-8601 parsing and UTC normalization    |
//! | [`error`]     | `CoreError`, `CoreResult`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to public types.            |

pub mod error;
pub mod geo;
pub mod ids;
pub mod mode;
pub mod point;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::Coord;
pub use ids::{EdgeId, NodeId};
pub use mode::TravelMode;
pub use point::{GeoPoint, straight_line_distance_km};
pub use time::{Timestamp, format_timestamp, parse_timestamp};
