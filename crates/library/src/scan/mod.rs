//! Discovery of media files and their sidecars.
//!
//! The entry point is [`scan`], which walks an export breadth-first and
//! partitions every file into media, sidecars, and ignored aggregate JSON.

pub(crate) mod error;
mod file;
mod walk;

pub use self::file::{EntryKind, Scan, is_ignored};
pub use self::walk::scan;
