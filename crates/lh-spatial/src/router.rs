//! Shortest paths by total edge length.
//!
//! # Pluggability
//!
//! Route computation calls into routing via the [`Router`] trait, so a
//! different engine (A*, contraction hierarchies) can be dropped in without
//! touching the batch code.  The default [`DijkstraRouter`] is plain
//! Dijkstra over the CSR arrays with early exit at the target.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use lh_core::{EdgeId, NodeId};

use crate::network::RoadNetwork;
use crate::SpatialError;

// ── NodePath ──────────────────────────────────────────────────────────────────

/// The result of a routing query: nodes in traversal order.
#[derive(Debug, Clone, PartialEq)]
pub struct NodePath {
    /// Nodes from source to destination inclusive.  Never empty.
    pub nodes: Vec<NodeId>,
    /// Sum of traversed edge lengths, metres.
    pub length_m: f64,
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// Implementations must be `Send + Sync`; one router value is shared by all
/// rayon workers in a batch.
pub trait Router: Send + Sync {
    /// Minimum-length path from `from` to `to` over `network`.
    ///
    /// `from == to` yields a single-node path.  Returns
    /// [`SpatialError::NoRoute`] when `to` is unreachable and
    /// [`SpatialError::NodeNotFound`] when either endpoint is not a node of
    /// `network`.
    fn route(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> Result<NodePath, SpatialError>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over `edge_length_m`.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> Result<NodePath, SpatialError> {
        dijkstra(network, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node: NodeId,
}

impl Eq for State {}

// Min-heap on cost; NodeId breaks ties so equal-length alternatives always
// resolve the same way.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn dijkstra(network: &RoadNetwork, from: NodeId, to: NodeId) -> Result<NodePath, SpatialError> {
    for node in [from, to] {
        if !network.contains(node) {
            return Err(SpatialError::NodeNotFound(node));
        }
    }
    if from == to {
        return Ok(NodePath { nodes: vec![from], length_m: 0.0 });
    }

    let n = network.node_count();
    // dist[v] = best known length (m) to reach v.
    let mut dist      = vec![f64::INFINITY; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0.0;

    let mut heap = BinaryHeap::new();
    heap.push(State { cost: 0.0, node: from });

    while let Some(State { cost, node }) = heap.pop() {
        if node == to {
            return Ok(reconstruct(network, &prev_edge, from, to, cost));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in network.out_edges(node) {
            let neighbor = network.edge_to[edge.index()];
            let new_cost = cost + network.edge_length_m[edge.index()];

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(State { cost: new_cost, node: neighbor });
            }
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(
    network:   &RoadNetwork,
    prev_edge: &[EdgeId],
    from:      NodeId,
    to:        NodeId,
    length_m:  f64,
) -> NodePath {
    let mut nodes = vec![to];
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        cur = network.edge_from[e.index()];
        nodes.push(cur);
    }
    nodes.reverse();
    NodePath { nodes, length_m }
}
