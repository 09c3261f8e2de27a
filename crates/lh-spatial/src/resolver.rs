//! Memoized nearest-node snapping.
//!
//! A [`NearestNodeResolver`] borrows exactly one [`RoadNetwork`] and owns the
//! cache for it.  Node ids from different networks are not comparable, so
//! the cache can never be handed to another network: a new network means a
//! new resolver.
//!
//! The cache is keyed on the exact bit pattern of `(lat, lon)`.  No spatial
//! tolerance is applied; two points a millimetre apart are two keys.
//!
//! A resolver is `Send` but never shared between threads.  Batch workers
//! each build their own (see `lh-routing::scheduler`).

use rustc_hash::FxHashMap;

use lh_core::{Coord, NodeId};

use crate::network::RoadNetwork;
use crate::{SpatialError, SpatialResult};

pub struct NearestNodeResolver<'n> {
    network:  &'n RoadNetwork,
    cache:    FxHashMap<(u64, u64), NodeId>,
    searches: usize,
}

impl<'n> NearestNodeResolver<'n> {
    pub fn new(network: &'n RoadNetwork) -> Self {
        Self {
            network,
            cache: FxHashMap::default(),
            searches: 0,
        }
    }

    /// The network this resolver snaps onto.
    #[inline]
    pub fn network(&self) -> &'n RoadNetwork {
        self.network
    }

    /// Nearest node to `pos`, however far away it is.
    ///
    /// # Errors
    ///
    /// [`SpatialError::InvalidPoint`] if `pos` is not finite,
    /// [`SpatialError::EmptyNetwork`] if the network has no nodes.
    pub fn resolve(&mut self, pos: Coord) -> SpatialResult<NodeId> {
        if !pos.is_finite() {
            return Err(SpatialError::InvalidPoint(pos));
        }
        let key = pos.key();
        if let Some(&node) = self.cache.get(&key) {
            return Ok(node);
        }

        let node = self
            .network
            .snap_to_node(pos)
            .ok_or(SpatialError::EmptyNetwork)?;
        self.searches += 1;
        self.cache.insert(key, node);
        Ok(node)
    }

    /// Number of nearest-neighbour searches actually run (cache misses).
    pub fn searches(&self) -> usize {
        self.searches
    }
}
