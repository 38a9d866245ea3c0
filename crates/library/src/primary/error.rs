//! Error types for the [`primary`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A matching error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for matching operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Structural faults only. Unparseable sidecars are a
/// [`Failure::ParseError`](crate::Failure::ParseError), not an error.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The sidecar was listed by the scanner but couldn't be read.
    #[display("could not read sidecar: {}", path.display())]
    Read { path: PathBuf, source: IoError },
}
impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
