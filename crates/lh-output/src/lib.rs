//! `lh-output`: the routes document written at the end of a run.
//!
//! | Module       | Contents                                          |
//! |--------------|---------------------------------------------------|
//! | [`document`] | `OutputDocument`, `RouteRecord`                   |
//! | [`json`]     | `JsonWriter` (temp file + rename)                 |
//! | [`error`]    | `OutputError`, `OutputResult<T>`                  |
//!
//! # Usage
//!
//! ```rust,ignore
//! use lh_output::{JsonWriter, OutputDocument};
//!
//! let doc = OutputDocument::new(&activities.routes, &transitions.routes, timeline, visits);
//! JsonWriter::new("routes.json").write(&doc)?;
//! ```

pub mod document;
pub mod error;
pub mod json;


pub use document::{OutputDocument, RouteRecord};
pub use error::{OutputError, OutputResult};
pub use json::JsonWriter;
