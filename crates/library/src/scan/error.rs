//! Error types for the [`scan`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::{Path, PathBuf};

/// A scan error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for scan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Every variant is fatal: a tree that can't be fully listed can't be
/// reconciled.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("directory not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    #[display("not a directory: {}", _0.display())]
    NotADirectory(#[error(not(source))] PathBuf),
    #[display("permission denied: {}", _0.display())]
    PermissionDenied(#[error(not(source))] PathBuf),
    #[display("I/O error: {_0}")]
    Io(IoError),
}
impl ErrorKind {
    pub(crate) fn from_io(e: IoError, path: &Path) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io(e),
        }
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
