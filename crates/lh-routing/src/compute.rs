//! Single-request route computation.
//!
//! ```text
//! request ──mode──▶ network ──resolve(start, end)──▶ nodes ──router──▶ path ──▶ coords
//! ```

use lh_core::TravelMode;
use lh_spatial::{NearestNodeResolver, RoadNetwork, Router};

use crate::request::{Route, TravelRequest};
use crate::RouteError;

/// One resolver per network, owned together by a single worker.
pub struct Resolvers<'n> {
    pub walk:  NearestNodeResolver<'n>,
    pub drive: NearestNodeResolver<'n>,
}

impl<'n> Resolvers<'n> {
    pub fn new(walk: &'n RoadNetwork, drive: &'n RoadNetwork) -> Self {
        Self {
            walk:  NearestNodeResolver::new(walk),
            drive: NearestNodeResolver::new(drive),
        }
    }

    /// Resolver for the network `mode` travels on.
    pub fn for_mode(&mut self, mode: TravelMode) -> &mut NearestNodeResolver<'n> {
        match mode {
            TravelMode::Walking => &mut self.walk,
            TravelMode::Driving => &mut self.drive,
        }
    }

    /// Total nearest-neighbour searches across both networks.
    pub fn searches(&self) -> usize {
        self.walk.searches() + self.drive.searches()
    }
}

/// Snap `request`'s endpoints onto the network for its mode and return the
/// shortest path between them as a [`Route`].
///
/// # Errors
///
/// A [`RouteError`] identifying the request: `NoPathFound` for disconnected
/// endpoints, `MalformedInput` for unsnappable points, `EmptyNetwork` if
/// the network has no nodes.
pub fn compute_route<R: Router>(
    request:   &TravelRequest,
    resolvers: &mut Resolvers<'_>,
    router:    &R,
) -> Result<Route, RouteError> {
    let resolver = resolvers.for_mode(request.mode);
    let network = resolver.network();

    let start_node = resolver
        .resolve(request.start.coord())
        .map_err(|e| RouteError::new(request, e))?;
    let end_node = resolver
        .resolve(request.end.coord())
        .map_err(|e| RouteError::new(request, e))?;

    // Not expected with a resolver bound to `network`; the router reports
    // the hard failure if it really happens.
    if !network.contains(start_node) || !network.contains(end_node) {
        log::warn!("snapped node outside the {} network for {request}", request.mode);
    }

    let path = router
        .route(network, start_node, end_node)
        .map_err(|e| RouteError::new(request, e))?;

    let coords = path
        .nodes
        .iter()
        .map(|&n| network.node_pos[n.index()])
        .collect();

    Ok(Route {
        label:  request.label.clone(),
        mode:   request.mode,
        time:   request.time,
        start:  request.start.clone(),
        end:    request.end.clone(),
        coords,
    })
}
