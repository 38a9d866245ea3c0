//! Primary matching: one sidecar, one media file.
//!
//! Each sidecar is resolved independently, first match wins:
//!
//! 1. **Override**: a configured literal filename. No fallback when it's
//!    missing.
//! 2. **Parse**: read the sidecar's `title`; unreadable JSON is a
//!    [`Failure::ParseError`].
//! 3. **Normalize**: [`derive_candidate`] undoes the export's renaming.
//! 4. **Exists**: the candidate must have been seen by the scanner.
//!
//! The resolved pair is then claimed in the
//! [`AssociationStore`](crate::store::AssociationStore), which may still
//! refuse it as a [`Failure::DuplicateCollision`].

pub mod error;
mod sidecar;

use crate::Context;
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::normalize::{Ambiguous, derive_candidate};
use crate::observer::{Event, Observer, Phase};
use crate::outcome::{Failure, SidecarStatus};
use crate::overrides::Overrides;
use crate::primary::error::Result as MatchResult;
use crate::scan::Scan;
use exn::ResultExt;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Where a single sidecar points, before the store has had its say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(PathBuf),
    Failed(Failure),
}

/// Resolves every sidecar in the context and records the results.
///
/// Business failures are reported to `observer` and recorded as the sidecar's
/// [`SidecarStatus`]; only a sidecar that can't be read at all aborts the pass.
pub fn match_sidecars(ctx: &mut Context, observer: &mut dyn Observer) -> LibraryResult<()> {
    match_sidecars_inner(ctx, observer).or_raise(|| LibraryErrorKind::Match)
}

fn match_sidecars_inner(ctx: &mut Context, observer: &mut dyn Observer) -> MatchResult<()> {
    let Context { scan, overrides, store, sidecars } = ctx;
    let total = scan.sidecars.len();
    observer.notify(Event::Started { phase: Phase::Match, total });

    for sidecar in &scan.sidecars {
        let failure = match resolve(scan, overrides, sidecar)? {
            Resolution::Found(media) => match store.add_primary(sidecar, &media) {
                Ok(()) => {
                    observer.notify(Event::Matched { sidecar: sidecar.clone(), media });
                    sidecars.insert(sidecar.clone(), SidecarStatus::Matched);
                    continue;
                },
                Err(collision) => Failure::DuplicateCollision(collision),
            },
            Resolution::Failed(failure) => failure,
        };
        if let Some(status) = SidecarStatus::from_failure(&failure) {
            sidecars.insert(sidecar.clone(), status);
        }
        observer.notify(Event::Failed(failure));
    }

    observer.notify(Event::MatchedSidecars { matched: store.primary_count(), total });
    Ok(())
}

/// Works out which media file `sidecar` describes.
///
/// Reads the sidecar from disk unless an override applies. Doesn't consult or
/// modify the store, so collisions aren't detected here.
#[instrument(level = "trace", skip(scan, overrides))]
pub fn resolve(scan: &Scan, overrides: &Overrides, sidecar: &Path) -> MatchResult<Resolution> {
    let dir = sidecar.parent().unwrap_or_else(|| Path::new(""));
    let basename = sidecar::basename(sidecar);

    if let Some(filename) = overrides.sidecar(&basename) {
        let candidate = dir.join(filename);
        return Ok(exists(scan, sidecar, candidate));
    }

    let title = match sidecar::parse_title(&sidecar::read(sidecar)?) {
        Ok(title) => title,
        Err(e) => {
            return Ok(Resolution::Failed(Failure::ParseError {
                sidecar: sidecar.to_path_buf(),
                reason: e.to_string(),
            }));
        },
    };

    match derive_candidate(dir, &basename, &title, |path| scan.has_media(path)) {
        Ok(candidate) => Ok(exists(scan, sidecar, candidate)),
        Err(Ambiguous(extensions)) => Ok(Resolution::Failed(Failure::AmbiguousExtension {
            sidecar: sidecar.to_path_buf(),
            title,
            extensions,
        })),
    }
}

fn exists(scan: &Scan, sidecar: &Path, candidate: PathBuf) -> Resolution {
    match scan.has_media(&candidate) {
        true => Resolution::Found(candidate),
        false => Resolution::Failed(Failure::FileMissing {
            sidecar: sidecar.to_path_buf(),
            candidate,
        }),
    }
}
