//! Core error type.
//!
//! Decoding failures are per-record: the loader logs and counts them and
//! moves on.

use thiserror::Error;

/// Errors produced while decoding the primitive values carried by an export.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("malformed point {text:?}: {reason}")]
    MalformedPoint { text: String, reason: &'static str },

    #[error("malformed timestamp {text:?}: {reason}")]
    MalformedTimestamp { text: String, reason: String },
}

impl CoreError {
    pub(crate) fn point(text: &str, reason: &'static str) -> Self {
        CoreError::MalformedPoint { text: text.to_owned(), reason }
    }
}

/// Shorthand result type for `lh-core`.
pub type CoreResult<T> = Result<T, CoreError>;
