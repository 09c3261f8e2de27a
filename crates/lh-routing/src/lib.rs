//! `lh-routing`: turning travel requests into network-snapped routes.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`request`]    | `TravelRequest`, `Route`                                  |
//! | [`compute`]    | `compute_route`, `Resolvers`                              |
//! | [`classify`]   | `classify`, `transitions`: distance-based mode labels    |
//! | [`scheduler`]  | `run_batch`, `run_sequential`, `run_parallel`, `BatchOutcome` |
//! | [`error`]      | `RouteError`, `RouteErrorKind`, `BatchError`              |
//!
//! # Failure model
//!
//! A request either yields a [`Route`] or a [`RouteError`] naming the kind of
//! failure and identifying the request.  The scheduler collects both; no
//! per-request failure ever aborts a batch.

pub mod classify;
pub mod compute;
pub mod error;
pub mod request;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use classify::{DRIVING_THRESHOLD_KM, Transitions, classify, mode_for_distance, transitions};
pub use compute::{Resolvers, compute_route};
pub use error::{BatchError, BatchResult, RouteError, RouteErrorKind, RouteFailure, UNCLASSIFIED_LABEL};
pub use request::{Route, TravelRequest};
pub use scheduler::{BatchOutcome, Execution, run_batch, run_parallel, run_sequential};
