//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Only *structural* faults end up here: a directory that can't be listed, a
//! sidecar that can't be read. Everything the matcher is expected to run into
//! (missing files, ambiguous names, collisions) is a [`Failure`](crate::Failure)
//! value instead, and never aborts a run.

use derive_more::{Display, Error};

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("could not scan the export directory")]
    Scan,
    #[display("could not match sidecar files")]
    Match,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
