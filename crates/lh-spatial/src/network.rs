//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_length_m`) are sorted by
//! source node and indexed by `EdgeId`.  Edge weight is physical length in
//! metres; a network is either pedestrian or vehicular, never both, so no
//! per-mode cost is stored.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps a coordinate to the nearest `NodeId`.  Points
//! are stored in an equirectangular projection centred on the network's mean
//! latitude (`x = lon·cos φ₀`, `y = lat`), which keeps nearest-node ranking
//! faithful to ground distance at city scale away from the equator.
//!
//! A built network is immutable and `Sync`; share it by reference across
//! worker threads.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use lh_core::{Coord, EdgeId, NodeId};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a projected `[x, y]` point with its `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in the projected plane.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed road graph in CSR format plus a spatial index for node snapping.
///
/// Fields are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`RoadNetworkBuilder`].
pub struct RoadNetwork {
    /// Coordinate of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Coord>,

    /// CSR row pointer.  Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Source node of each edge.  Used to walk `prev_edge` back to the
    /// origin during path reconstruction.
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Length of each edge in metres.  Shortest-path weight.
    pub edge_length_m: Vec<f64>,

    /// `cos φ₀` of the projection used by `spatial_idx`.
    lon_scale: f64,

    spatial_idx: RTree<NodeEntry>,
}

impl RoadNetwork {
    /// Construct a network with no nodes or edges.
    ///
    /// Every snap against it fails with `SpatialError::EmptyNetwork`.
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// `true` if `node` is a valid index into this network.
    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    /// Coordinate of `node`, or `None` if it is not in this network.
    #[inline]
    pub fn node_coord(&self, node: NodeId) -> Option<Coord> {
        self.node_pos.get(node.index()).copied()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// This is a contiguous index range; no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(EdgeId::from_index)
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the nearest node to `pos`.
    ///
    /// Unmemoized; callers that snap repeatedly go through
    /// [`NearestNodeResolver`](crate::NearestNodeResolver).  Returns `None`
    /// only if the network has no nodes.
    pub fn snap_to_node(&self, pos: Coord) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&project(pos, self.lon_scale))
            .map(|e| e.id)
    }
}

#[inline]
fn project(pos: Coord, lon_scale: f64) -> [f64; 2] {
    [pos.lon * lon_scale, pos.lat]
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and directed edges in any order.  `build()`
/// sorts edges by source node, constructs the CSR arrays, and bulk-loads the
/// R-tree.
///
/// # Example
///
/// ```
/// use lh_core::Coord;
/// use lh_spatial::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(Coord::new(38.700, -9.150));
/// let c = b.add_node(Coord::new(38.710, -9.140));
/// b.add_measured_road(a, c);
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // bidirectional
/// ```
pub struct RoadNetworkBuilder {
    nodes:     Vec<Coord>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:     NodeId,
    to:       NodeId,
    length_m: f64,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), raw_edges: Vec::new() }
    }

    /// Pre-allocate for the expected number of nodes and edges to reduce
    /// reallocations when bulk-loading from OSM.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: Coord) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** edge from `from` to `to` of `length_m` metres.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_m: f64) {
        self.raw_edges.push(RawEdge { from, to, length_m });
    }

    /// Add edges in **both directions** for an undirected segment.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length_m: f64) {
        self.add_directed_edge(a, b, length_m);
        self.add_directed_edge(b, a, length_m);
    }

    /// [`add_road`](Self::add_road) with the haversine length between the
    /// two endpoints.
    pub fn add_measured_road(&mut self, a: NodeId, b: NodeId) {
        let length_m = self.node_pos(a).distance_m(self.node_pos(b));
        self.add_road(a, b, length_m);
    }

    /// Keep only the largest weakly connected component; return how many
    /// nodes were removed.
    ///
    /// Edge direction is ignored when grouping, so a one-way loop stays with
    /// the roads it joins.  Surviving nodes are renumbered densely in their
    /// original order.  Ties go to the component holding the lowest node id.
    /// Edges touching a removed or unknown node are dropped.
    pub fn retain_largest_component(&mut self) -> usize {
        let n = self.nodes.len();
        if n == 0 {
            return 0;
        }

        let mut parent: Vec<usize> = (0..n).collect();
        for e in &self.raw_edges {
            let (a, b) = (e.from.index(), e.to.index());
            if a < n && b < n {
                let (ra, rb) = (find_root(&mut parent, a), find_root(&mut parent, b));
                if ra != rb {
                    parent[ra.max(rb)] = ra.min(rb);
                }
            }
        }

        let roots: Vec<usize> = (0..n).map(|i| find_root(&mut parent, i)).collect();
        let mut size = vec![0usize; n];
        for &r in &roots {
            size[r] += 1;
        }
        let mut best = roots[0];
        for &r in &roots {
            if size[r] > size[best] {
                best = r;
            }
        }
        let kept = size[best];
        if kept == n {
            return 0;
        }

        let mut remap = vec![NodeId::INVALID; n];
        let mut nodes = Vec::with_capacity(kept);
        for (i, &pos) in self.nodes.iter().enumerate() {
            if roots[i] == best {
                remap[i] = NodeId::from_index(nodes.len());
                nodes.push(pos);
            }
        }
        self.raw_edges.retain_mut(|e| {
            let (a, b) = (e.from.index(), e.to.index());
            if a >= n || b >= n || remap[a] == NodeId::INVALID || remap[b] == NodeId::INVALID {
                return false;
            }
            e.from = remap[a];
            e.to = remap[b];
            true
        });
        self.nodes = nodes;
        n - kept
    }

    /// Look up the position of a node added earlier.
    pub fn node_pos(&self, id: NodeId) -> Coord {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// Edges referencing nodes that were never added are dropped with a
    /// warning.  Time complexity: O(E log E) for the edge sort + O(N log N)
    /// for the R-tree bulk load.
    pub fn build(self) -> RoadNetwork {
        let node_count = self.nodes.len();

        let mut raw = self.raw_edges;
        let before = raw.len();
        raw.retain(|e| e.from.index() < node_count && e.to.index() < node_count);
        if raw.len() != before {
            log::warn!(
                "dropped {} edge(s) referencing unknown nodes",
                before - raw.len()
            );
        }
        let edge_count = raw.len();

        // Sort edges by source node for CSR construction.
        raw.sort_unstable_by_key(|e| (e.from.0, e.to.0));

        let edge_from:     Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:       Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_length_m: Vec<f64>    = raw.iter().map(|e| e.length_m).collect();

        // Build CSR row pointer (node_out_start).
        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let lon_scale = if node_count == 0 {
            1.0
        } else {
            let mean_lat = self.nodes.iter().map(|p| p.lat).sum::<f64>() / node_count as f64;
            mean_lat.to_radians().cos().max(f64::EPSILON)
        };

        // Bulk-load R-tree for O(N log N) construction (faster than N inserts).
        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: project(pos, lon_scale),
                id:    NodeId::from_index(i),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        RoadNetwork {
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            lon_scale,
            spatial_idx,
        }
    }
}

/// Union-find root with path halving.
fn find_root(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
