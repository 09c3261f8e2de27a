//! Batch execution of route requests.
//!
//! # Execution models
//!
//! | Model                   | Resolver state                    | Used for     |
//! |-------------------------|-----------------------------------|--------------|
//! | [`run_sequential`]      | one pair for the whole batch      | activities   |
//! | [`run_parallel`]        | one private pair per rayon job    | transitions  |
//!
//! Networks are shared by reference; they are immutable after build.
//! Resolver caches are never shared between workers.  Parallel workers each
//! warm their own cache, so the same coordinate may be searched once per
//! worker instead of once per batch.  The result is identical either way
//! because the search is deterministic.
//!
//! # Ordering
//!
//! `BatchOutcome::routes` is a set in `Vec` clothing.  Consumers must match
//! routes to requests by `time`/`start`/`end`, never by position.

use std::collections::BTreeMap;

use rayon::prelude::*;

use lh_spatial::{RoadNetwork, Router};

use crate::compute::{Resolvers, compute_route};
use crate::request::{Route, TravelRequest};
use crate::{BatchError, BatchResult, RouteError, RouteErrorKind};

/// How to run a batch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Execution {
    /// On the calling thread, one shared resolver pair.
    Sequential,
    /// On a dedicated pool of at most `max_workers` threads.
    Parallel { max_workers: usize },
}

/// Routes produced by a batch plus every request that was dropped.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Number of requests submitted.
    pub requested: usize,
    /// Produced routes, in no particular order.
    pub routes:    Vec<Route>,
    /// Dropped requests, in no particular order.
    pub failures:  Vec<RouteError>,
}

impl BatchOutcome {
    fn collect(requested: usize, results: impl IntoIterator<Item = Result<Route, RouteError>>) -> Self {
        let mut outcome = BatchOutcome { requested, ..Default::default() };
        for result in results {
            match result {
                Ok(route) => outcome.routes.push(route),
                Err(e) => {
                    log::warn!("dropping request: {e}");
                    outcome.failures.push(e);
                }
            }
        }
        outcome
    }

    /// Account for requests that failed before reaching the batch: each
    /// counts as requested and dropped.
    pub fn absorb_rejected(&mut self, rejected: Vec<RouteError>) {
        self.requested += rejected.len();
        for e in rejected {
            log::warn!("dropping request: {e}");
            self.failures.push(e);
        }
    }

    pub fn produced(&self) -> usize {
        self.routes.len()
    }

    /// Failure count per kind.
    pub fn failures_by_kind(&self) -> BTreeMap<RouteErrorKind, usize> {
        let mut counts = BTreeMap::new();
        for f in &self.failures {
            *counts.entry(f.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Log `requested → produced` and the failure breakdown at `info`.
    pub fn log_summary(&self, batch: &str) {
        log::info!(
            "{batch}: {} requested, {} produced, {} dropped",
            self.requested,
            self.produced(),
            self.failures.len()
        );
        for (kind, n) in self.failures_by_kind() {
            log::info!("{batch}:   {n} × {kind}");
        }
    }
}

/// Run `requests` with the given execution model.
pub fn run_batch<R: Router>(
    requests:  &[TravelRequest],
    walk:      &RoadNetwork,
    drive:     &RoadNetwork,
    router:    &R,
    execution: Execution,
) -> BatchResult<BatchOutcome> {
    match execution {
        Execution::Sequential => Ok(run_sequential(requests, walk, drive, router)),
        Execution::Parallel { max_workers } => run_parallel(requests, walk, drive, router, max_workers),
    }
}

/// Compute every request on the calling thread with one resolver pair, so
/// repeated endpoints hit the cache across the whole batch.
pub fn run_sequential<R: Router>(
    requests: &[TravelRequest],
    walk:     &RoadNetwork,
    drive:    &RoadNetwork,
    router:   &R,
) -> BatchOutcome {
    let mut resolvers = Resolvers::new(walk, drive);
    let results: Vec<_> = requests
        .iter()
        .map(|req| compute_route(req, &mut resolvers, router))
        .collect();
    log::debug!(
        "sequential batch: {} nearest-node searches for {} requests",
        resolvers.searches(),
        requests.len()
    );
    BatchOutcome::collect(requests.len(), results)
}

/// Compute every request on a pool of `max_workers` threads.
///
/// # Errors
///
/// [`BatchError::ZeroWorkers`] if `max_workers == 0`; a pool start-up
/// failure as [`BatchError::ThreadPool`].  Per-request failures land in
/// [`BatchOutcome::failures`].
pub fn run_parallel<R: Router>(
    requests:    &[TravelRequest],
    walk:        &RoadNetwork,
    drive:       &RoadNetwork,
    router:      &R,
    max_workers: usize,
) -> BatchResult<BatchOutcome> {
    if max_workers == 0 {
        return Err(BatchError::ZeroWorkers);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(max_workers)
        .thread_name(|i| format!("route-worker-{i}"))
        .build()?;

    let results: Vec<_> = pool.install(|| {
        requests
            .par_iter()
            .map_init(
                || Resolvers::new(walk, drive),
                |resolvers, req| compute_route(req, resolvers, router),
            )
            .collect()
    });

    Ok(BatchOutcome::collect(requests.len(), results))
}
