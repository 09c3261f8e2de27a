//! `lh-input`: reading a raw location-history export.
//!
//! The export is a JSON array of loosely-shaped records.  This crate turns it
//! into typed variants exactly once; nothing downstream ever looks at the raw
//! JSON again.
//!
//! | Module     | Contents                                                    |
//! |------------|-------------------------------------------------------------|
//! | [`record`] | `Record`, `PathPoint`, `TimelinePoint`, `ActivityRecord`   |
//! | [`loader`] | `load_export`, `Window`, `Export`, `LoadReport`            |
//! | [`error`]  | `InputError`, `InputResult<T>`                             |

pub mod error;
pub mod loader;
pub mod record;


pub use error::{InputError, InputResult};
pub use loader::{Export, LoadReport, Window, load_export, load_export_reader};
pub use record::{ActivityRecord, PathPoint, Record, TimelinePoint, TimelineRecord, VisitPoint, VisitRecord};
