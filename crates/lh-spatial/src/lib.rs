//! `lh-spatial`: road networks, nearest-node snapping, and shortest paths.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`network`]  | `RoadNetwork` (CSR + R-tree), `RoadNetworkBuilder`         |
//! | [`resolver`] | `NearestNodeResolver`: memoized snapping, one per network |
//! | [`router`]   | `Router` trait, `NodePath`, `DijkstraRouter`              |
//! | [`osm`]      | `load_from_pbf` (feature = `"osm"` only)                  |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `osm`   | Enables OSM PBF loading via the `osmpbf` crate.             |
//! | `serde` | Derives `Serialize`/`Deserialize` on `lh-core` types.        |

pub mod error;
pub mod network;
pub mod resolver;
pub mod router;

#[cfg(feature = "osm")]
pub mod osm;


pub use error::{SpatialError, SpatialResult};
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use resolver::NearestNodeResolver;
pub use router::{DijkstraRouter, NodePath, Router};
