//! Error types for lh-pipeline.

use thiserror::Error;

use lh_input::InputError;
use lh_routing::BatchError;

use crate::ConfigError;

/// Failures that abort a run.  Per-request routing failures never appear
/// here; they are counted in the run summary.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("input error: {0}")]
    Input(#[from] InputError),

    #[error("the {0} network has no nodes")]
    EmptyNetwork(&'static str),

    #[error("batch error: {0}")]
    Batch(#[from] BatchError),
}

/// Alias for `Result<T, PipelineError>`.
pub type PipelineResult<T> = Result<T, PipelineError>;
