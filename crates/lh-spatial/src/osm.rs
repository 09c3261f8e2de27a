//! OSM PBF loader, enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use lh_core::Coord;
//! use lh_spatial::osm::{Area, NetworkKind, load_from_pbf};
//!
//! let area = Area { center: Coord::new(38.7223, -9.1393), radius_m: 5_000.0 };
//! let walk = load_from_pbf(Path::new("lisbon.osm.pbf"), NetworkKind::Walk, Some(area))?;
//! ```
//!
//! # What is loaded
//!
//! `highway=*` ways accepted by the [`NetworkKind`] filter.  Walk networks
//! are fully bidirectional; drive networks respect `oneway` and the implicit
//! one-way of motorways and roundabouts.  Edge weight is haversine length.
//!
//! With an [`Area`], only nodes within `radius_m` of `center` are kept and
//! segments leaving the circle are cut.  Only the largest connected
//! component survives (weakly connected for drive networks); the fragments
//! clipping leaves behind are dropped.
//!
//! # Memory note
//!
//! All OSM nodes are buffered in a `HashMap<i64, Coord>` during the first
//! pass because ways reference nodes by OSM id.  The map is freed before the
//! R-tree is built.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use osmpbf::{Element, ElementReader};

use lh_core::{Coord, NodeId};

use crate::network::{RoadNetwork, RoadNetworkBuilder};
use crate::SpatialError;

/// Which travellers a network is built for.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum NetworkKind {
    Walk,
    Drive,
}

/// Circular clip region.
#[derive(Copy, Clone, Debug)]
pub struct Area {
    pub center:   Coord,
    pub radius_m: f64,
}

impl Area {
    fn contains(&self, pos: Coord) -> bool {
        self.center.distance_m(pos) <= self.radius_m
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Load a `kind` road network from an OSM PBF file, optionally clipped to
/// `area`.
///
/// # Errors
///
/// Returns [`SpatialError::Osm`] on read or parse errors.
pub fn load_from_pbf(
    path: &Path,
    kind: NetworkKind,
    area: Option<Area>,
) -> Result<RoadNetwork, SpatialError> {
    // ── Phase 1: collect all OSM nodes + accepted ways in one pass ────────
    let reader = ElementReader::from_path(path).map_err(|e| SpatialError::Osm(e.to_string()))?;

    let mut all_nodes: HashMap<i64, Coord> = HashMap::new();
    let mut ways: Vec<OsmWay> = Vec::new();

    reader
        .for_each(|elem| match elem {
            Element::Node(n) => {
                all_nodes.insert(n.id(), Coord::new(n.lat(), n.lon()));
            }
            Element::DenseNode(n) => {
                all_nodes.insert(n.id(), Coord::new(n.lat(), n.lon()));
            }
            Element::Way(w) => {
                // Collect tags eagerly so &str lifetimes don't escape the closure.
                let tags: Vec<(&str, &str)> = w.tags().collect();
                let Some(highway) = tag(&tags, "highway") else {
                    return;
                };
                let accepted = match kind {
                    NetworkKind::Walk  => is_walkable(highway, &tags),
                    NetworkKind::Drive => is_drivable(highway, &tags),
                };
                if accepted {
                    let oneway = kind == NetworkKind::Drive && is_oneway(highway, &tags);
                    let reversed = oneway && tag(&tags, "oneway") == Some("-1");
                    let mut refs: Vec<i64> = w.refs().collect();
                    if reversed {
                        refs.reverse();
                    }
                    ways.push(OsmWay { refs, oneway });
                }
            }
            _ => {}
        })
        .map_err(|e| SpatialError::Osm(e.to_string()))?;

    // ── Phase 2: road-referenced node ids inside the area ─────────────────
    let road_node_ids: HashSet<i64> = ways
        .iter()
        .flat_map(|w| w.refs.iter().copied())
        .filter(|id| match (area, all_nodes.get(id)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(a), Some(&pos)) => a.contains(pos),
        })
        .collect();

    // ── Phase 3: build network ────────────────────────────────────────────
    let mut builder = RoadNetworkBuilder::with_capacity(
        road_node_ids.len(),
        road_node_ids.len() * 2,
    );

    // Sorted so NodeIds are stable across runs on the same extract.
    let mut ordered: Vec<i64> = road_node_ids.into_iter().collect();
    ordered.sort_unstable();

    let mut osm_to_lh: HashMap<i64, NodeId> = HashMap::with_capacity(ordered.len());
    for osm_id in ordered {
        if let Some(&pos) = all_nodes.get(&osm_id) {
            osm_to_lh.insert(osm_id, builder.add_node(pos));
        }
    }

    drop(all_nodes);

    for way in &ways {
        for window in way.refs.windows(2) {
            let (osm_a, osm_b) = (window[0], window[1]);
            if let (Some(&from), Some(&to)) = (osm_to_lh.get(&osm_a), osm_to_lh.get(&osm_b)) {
                if way.oneway {
                    let len_m = builder.node_pos(from).distance_m(builder.node_pos(to));
                    builder.add_directed_edge(from, to, len_m);
                } else {
                    builder.add_measured_road(from, to);
                }
            }
        }
    }

    // Clipping leaves stubs and islands; endpoints must never snap onto them.
    let removed = builder.retain_largest_component();
    if removed > 0 {
        log::debug!("{kind:?}: dropped {removed} node(s) outside the largest connected component");
    }

    log::debug!(
        "loaded {kind:?} network from {}: {} nodes, {} edges",
        path.display(),
        builder.node_count(),
        builder.edge_count()
    );

    Ok(builder.build())
}

// ── Internal types ────────────────────────────────────────────────────────────

struct OsmWay {
    refs:   Vec<i64>,
    oneway: bool,
}

// ── Tag helpers ───────────────────────────────────────────────────────────────

fn tag<'a>(tags: &[(&str, &'a str)], key: &str) -> Option<&'a str> {
    tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn is_private(tags: &[(&str, &str)]) -> bool {
    tag(tags, "access") == Some("private") || tag(tags, "service") == Some("private")
}

/// Highway values no network ever routes over.
fn is_unbuilt(highway: &str) -> bool {
    matches!(
        highway,
        "abandoned" | "bus_guideway" | "construction" | "no" | "planned"
            | "platform" | "proposed" | "raceway" | "razed"
    )
}

/// Pedestrian filter: everything except motor roads, cycleways, areas, and
/// ways closed to foot traffic.
fn is_walkable(highway: &str, tags: &[(&str, &str)]) -> bool {
    !is_unbuilt(highway)
        && !matches!(highway, "cycleway" | "motor" | "motorway" | "motorway_link")
        && tag(tags, "area") != Some("yes")
        && tag(tags, "foot") != Some("no")
        && !is_private(tags)
}

/// Vehicular filter: public car-drivable roads.
fn is_drivable(highway: &str, tags: &[(&str, &str)]) -> bool {
    let non_car = matches!(
        highway,
        "bridleway" | "corridor" | "cycleway" | "elevator" | "escalator" | "footway"
            | "path" | "pedestrian" | "service" | "steps" | "track"
    );
    !is_unbuilt(highway)
        && !non_car
        && tag(tags, "area") != Some("yes")
        && tag(tags, "motor_vehicle") != Some("no")
        && tag(tags, "motorcar") != Some("no")
        && !is_private(tags)
}

/// Determine whether a drivable way is one-way.
///
/// Motorways and roundabouts are implicitly one-way in OSM convention.
fn is_oneway(highway: &str, tags: &[(&str, &str)]) -> bool {
    let explicit = tags.iter().any(|(k, v)| {
        *k == "oneway" && matches!(*v, "yes" | "1" | "true" | "-1")
    });
    let implicit = matches!(highway, "motorway" | "motorway_link")
        || tag(tags, "junction") == Some("roundabout");
    explicit || implicit
}
