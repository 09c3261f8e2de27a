//! Run orchestration.
//!
//! Declared activities are routed sequentially with one shared resolver
//! pair; timeline transitions are classified and routed in parallel.  A
//! transition touching a malformed timeline point is counted as requested
//! and dropped.  Both
//! networks are checked before any routing starts.

use std::fmt;
use std::path::Path;

use lh_input::{Export, LoadReport, load_export};
use lh_output::OutputDocument;
use lh_routing::{BatchOutcome, Execution, Transitions, TravelRequest, run_batch, transitions};
use lh_spatial::{DijkstraRouter, RoadNetwork};

use crate::{Config, PipelineError, PipelineResult};

/// Requested vs produced for one batch.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchCounts {
    pub requested: usize,
    pub produced:  usize,
}

impl BatchCounts {
    pub fn dropped(&self) -> usize {
        self.requested - self.produced
    }
}

impl From<&BatchOutcome> for BatchCounts {
    fn from(outcome: &BatchOutcome) -> Self {
        Self { requested: outcome.requested, produced: outcome.produced() }
    }
}

/// Counts describing one run.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub load:        LoadReport,
    pub activities:  BatchCounts,
    pub transitions: BatchCounts,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "activities {}/{} routed, timeline transitions {}/{} routed",
            self.activities.produced,
            self.activities.requested,
            self.transitions.produced,
            self.transitions.requested
        )
    }
}

#[derive(Debug)]
pub struct RunOutput {
    pub document: OutputDocument,
    pub summary:  RunSummary,
}

/// Load `input` with the config's window and route it.
pub fn run(
    config: &Config,
    input:  &Path,
    walk:   &RoadNetwork,
    drive:  &RoadNetwork,
) -> PipelineResult<RunOutput> {
    config.validate()?;
    log::info!("loading {}", input.display());
    let export = load_export(input, &config.window())?;
    route_export(export, walk, drive, config.compute.max_workers)
}

/// Route an already-loaded export.
///
/// # Errors
///
/// [`PipelineError::EmptyNetwork`] if either network has no nodes,
/// [`PipelineError::Batch`] if the worker pool cannot run.
pub fn route_export(
    export:      Export,
    walk:        &RoadNetwork,
    drive:       &RoadNetwork,
    max_workers: usize,
) -> PipelineResult<RunOutput> {
    if walk.is_empty() {
        return Err(PipelineError::EmptyNetwork("walk"));
    }
    if drive.is_empty() {
        return Err(PipelineError::EmptyNetwork("drive"));
    }

    let Export { timeline, activities, visits, report } = export;
    log::info!("{report}");

    let router = DijkstraRouter;

    let activity_requests: Vec<TravelRequest> = activities.iter().map(TravelRequest::from_activity).collect();
    log::info!("routing {} activities", activity_requests.len());
    let activity_outcome = run_batch(&activity_requests, walk, drive, &router, Execution::Sequential)?;
    activity_outcome.log_summary("activities");

    let Transitions { requests, rejected } = transitions(&timeline);
    log::info!(
        "routing {} timeline transitions on {max_workers} workers ({} with malformed points)",
        requests.len() + rejected.len(),
        rejected.len()
    );
    let mut transition_outcome =
        run_batch(&requests, walk, drive, &router, Execution::Parallel { max_workers })?;
    transition_outcome.absorb_rejected(rejected);
    transition_outcome.log_summary("timeline transitions");

    let summary = RunSummary {
        load:        report,
        activities:  BatchCounts::from(&activity_outcome),
        transitions: BatchCounts::from(&transition_outcome),
    };
    let document = OutputDocument::new(&activity_outcome.routes, &transition_outcome.routes, timeline, visits);

    Ok(RunOutput { document, summary })
}
