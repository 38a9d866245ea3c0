use crate::consts::{IGNORED_SIDECARS, SIDECAR_EXTENSION, SUFFIX_REGEX};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// What the scanner does with a single non-directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Media,
    Sidecar,
    /// An aggregate JSON file (album comments, account metadata…).
    Ignored,
}
impl EntryKind {
    /// Classifies a file by name alone. No extension filtering is applied to
    /// media: anything that isn't JSON is a candidate.
    pub fn of(name: &str) -> Self {
        match name.strip_suffix(SIDECAR_EXTENSION) {
            None => Self::Media,
            Some(basename) if is_ignored(basename) => Self::Ignored,
            Some(_) => Self::Sidecar,
        }
    }
}

/// Whether a sidecar basename (without `.json`) is on the ignore list,
/// including duplicate-indexed variants such as `metadata(1)`.
///
/// ```
/// use sidematch_library::scan::is_ignored;
/// assert!(is_ignored("metadata"));
/// assert!(is_ignored("metadata(2)"));
/// assert!(!is_ignored("metadata.jpg"));
/// ```
pub fn is_ignored(basename: &str) -> bool {
    let basename = SUFFIX_REGEX.replace(basename, "");
    IGNORED_SIDECARS.contains(&basename.as_ref())
}

/// The files found under a root directory, partitioned by kind.
///
/// The sets are disjoint by construction. Paths are the directory path joined
/// with the entry's name, so they can be compared with derived candidates
/// directly.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Scan {
    pub(crate) root: PathBuf,
    pub(crate) media: BTreeSet<PathBuf>,
    pub(crate) sidecars: BTreeSet<PathBuf>,
    pub(crate) ignored: BTreeSet<PathBuf>,
}
impl Scan {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Files a caller already knows about; sorted by name into the right set.
    pub fn from_paths(root: impl Into<PathBuf>, paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        let mut scan = Self::new(root);
        for path in paths {
            scan.insert(path.into());
        }
        scan
    }

    /// Files the entry into the set matching its name, returning its kind.
    pub(crate) fn insert(&mut self, path: PathBuf) -> EntryKind {
        let kind = EntryKind::of(&path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default());
        match kind {
            EntryKind::Media => self.media.insert(path),
            EntryKind::Sidecar => self.sidecars.insert(path),
            EntryKind::Ignored => self.ignored.insert(path),
        };
        kind
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn media(&self) -> &BTreeSet<PathBuf> {
        &self.media
    }

    pub fn sidecars(&self) -> &BTreeSet<PathBuf> {
        &self.sidecars
    }

    pub fn ignored(&self) -> &BTreeSet<PathBuf> {
        &self.ignored
    }

    pub fn has_media(&self, path: impl AsRef<Path>) -> bool {
        self.media.contains(path.as_ref())
    }
}
