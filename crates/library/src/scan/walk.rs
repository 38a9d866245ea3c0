use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::observer::{Event, Observer, Phase};
use crate::scan::error::{ErrorKind, Result as ScanResult};
use crate::scan::file::{EntryKind, Scan};
use exn::ResultExt;
use std::collections::VecDeque;
use std::fs::{self, DirEntry};
use std::path::{Path, PathBuf};
use tracing::instrument;

enum WalkEntry {
    File(PathBuf),
    Descend(PathBuf),
}

/// Walks `root` breadth-first and partitions every file underneath it.
///
/// Directories are visited in FIFO order from an explicit queue, and entries
/// within a directory in name order, so two scans of the same tree report
/// events in the same order. A [`Discovered`](Event::Discovered) event is
/// emitted for every sidecar found.
///
/// # Errors
/// Any directory that can't be listed aborts the scan with
/// [`LibraryErrorKind::Scan`].
pub fn scan(root: impl AsRef<Path>, observer: &mut dyn Observer) -> LibraryResult<Scan> {
    scan_inner(root.as_ref(), observer).or_raise(|| LibraryErrorKind::Scan)
}

#[instrument(level = "debug", skip(observer))]
pub(crate) fn scan_inner(root: &Path, observer: &mut dyn Observer) -> ScanResult<Scan> {
    let metadata = fs::metadata(root).map_err(|e| ErrorKind::from_io(e, root))?;
    if !metadata.is_dir() {
        exn::bail!(ErrorKind::NotADirectory(root.to_path_buf()));
    }
    observer.notify(Event::Started { phase: Phase::Scan, total: 0 });

    let mut scan = Scan::new(root);
    let mut pending = VecDeque::from([root.to_path_buf()]);
    while let Some(dir) = pending.pop_front() {
        observer.notify(Event::Directory(dir.clone()));
        for entry in read_sorted(&dir)? {
            match process_entry(&entry)? {
                WalkEntry::Descend(path) => pending.push_back(path),
                WalkEntry::File(path) => {
                    if scan.insert(path) == EntryKind::Sidecar {
                        observer.notify(Event::Discovered { total: scan.sidecars.len() });
                    }
                },
            }
        }
    }
    Ok(scan)
}

fn read_sorted(dir: &Path) -> ScanResult<Vec<DirEntry>> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| ErrorKind::from_io(e, dir))?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| ErrorKind::from_io(e, dir))?;
    entries.sort_by_key(DirEntry::file_name);
    Ok(entries)
}

fn process_entry(entry: &DirEntry) -> ScanResult<WalkEntry> {
    let path = entry.path();
    // Symlinks aren't followed: a link to a directory is recorded like any other file.
    let file_type = entry.file_type().map_err(|e| ErrorKind::from_io(e, &path))?;
    Ok(match file_type.is_dir() {
        true => WalkEntry::Descend(path),
        false => WalkEntry::File(path),
    })
}
