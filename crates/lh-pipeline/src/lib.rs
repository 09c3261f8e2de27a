//! `lh-pipeline`: one run from export file to output document.
//!
//! ```text
//! config ─▶ load_export(window) ─┬─ activities ──▶ run_sequential ─┐
//!                                ├─ timeline ──▶ transitions ──▶ run_parallel ─┤
//!                                └─ visits ─────────────────────────────────────┴─▶ OutputDocument
//! ```
//!
//! | Module       | Contents                                        |
//! |--------------|-------------------------------------------------|
//! | [`config`]   | `Config` (TOML), `ConfigError`                  |
//! | [`pipeline`] | `run`, `route_export`, `RunOutput`, `RunSummary` |
//! | [`error`]    | `PipelineError`, `PipelineResult<T>`            |

pub mod config;
pub mod error;
pub mod pipeline;


pub use config::{ComputeConfig, Config, ConfigError, MapConfig};
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{BatchCounts, RunOutput, RunSummary, route_export, run};
