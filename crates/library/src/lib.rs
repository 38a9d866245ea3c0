mod consts;
pub mod error;
pub mod normalize;
pub mod observer;
pub mod outcome;
pub mod overrides;
pub mod primary;
pub mod reconcile;
pub mod scan;
pub mod store;

pub use crate::consts::MAX_FILENAME_LENGTH;
pub use crate::observer::{Event, Observer, Recorder, TracingObserver};
pub use crate::outcome::{Failure, MediaStatus, SidecarStatus, Summary};
pub use crate::overrides::Overrides;
pub use crate::scan::Scan;
pub use crate::store::{AssociationStore, Collision};

use crate::error::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Everything one run knows: what was found on disk, how it was configured,
/// and what has been matched so far.
#[derive(Debug, Clone)]
pub struct Context {
    pub(crate) scan: Scan,
    pub(crate) overrides: Overrides,
    pub(crate) store: AssociationStore,
    pub(crate) sidecars: BTreeMap<PathBuf, SidecarStatus>,
}
impl Context {
    pub fn new(scan: Scan, overrides: Overrides) -> Self {
        Self {
            scan,
            overrides,
            store: AssociationStore::new(),
            sidecars: BTreeMap::new(),
        }
    }

    pub fn scan(&self) -> &Scan {
        &self.scan
    }

    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    pub fn store(&self) -> &AssociationStore {
        &self.store
    }

    /// `None` until the primary pass has visited the sidecar.
    pub fn sidecar_status(&self, sidecar: impl AsRef<Path>) -> Option<SidecarStatus> {
        self.sidecars.get(sidecar.as_ref()).copied()
    }

    /// How a scanned file ended up. `None` for paths the scanner never saw, and
    /// for sidecars.
    pub fn media_status(&self, path: impl AsRef<Path>) -> Option<MediaStatus> {
        let path = path.as_ref();
        if self.scan.ignored.contains(path) {
            return Some(MediaStatus::Ignored);
        }
        if !self.scan.has_media(path) {
            return None;
        }
        Some(match self.store.owner_of(path) {
            Some(_) if self.store.is_primary(path) => MediaStatus::Primary,
            Some(_) => MediaStatus::Extra,
            None => MediaStatus::Unmatched,
        })
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for status in self.sidecars.values() {
            summary.count_sidecar(*status);
        }
        for path in self.scan.media.iter().chain(&self.scan.ignored) {
            if let Some(status) = self.media_status(path) {
                summary.count_media(status);
            }
        }
        summary
    }
}

/// Scans `root`, matches every sidecar, then attaches what companions it can.
///
/// Non-fatal failures are reported to `observer` and left in the returned
/// context; only I/O problems abort the run.
#[instrument(skip_all, fields(root = %root.as_ref().display()))]
pub fn run(root: impl AsRef<Path>, overrides: Overrides, observer: &mut dyn Observer) -> Result<Context> {
    let scan = scan::scan(root.as_ref(), observer)?;
    let mut ctx = Context::new(scan, overrides);
    primary::match_sidecars(&mut ctx, observer)?;
    reconcile::reconcile(&mut ctx, observer);
    Ok(ctx)
}
