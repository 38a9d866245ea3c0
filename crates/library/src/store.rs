//! Collision-checked sidecar ↔ media associations.
//!
//! Every media file has at most one owner, whether it was claimed as a
//! sidecar's primary file or attached later as one of its extras. The first
//! claim wins; later claims are rejected with a [`Collision`] and leave the
//! store untouched. There is no removal.

use derive_more::{Display, Error};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A media file claimed by a second sidecar.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("duplicate file match: {} new: {} old: {}", media.display(), attempted.display(), owner.display())]
pub struct Collision {
    /// The contested media file.
    pub media: PathBuf,
    /// The sidecar that already owns it.
    pub owner: PathBuf,
    /// The sidecar whose claim was refused.
    pub attempted: PathBuf,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AssociationStore {
    /// Sidecar → primary media file.
    primary: BTreeMap<PathBuf, PathBuf>,
    /// Media file → owning sidecar, for primary and extra claims alike.
    owners: BTreeMap<PathBuf, PathBuf>,
    /// Sidecar → companion files, in attachment order.
    extras: BTreeMap<PathBuf, Vec<PathBuf>>,
}
impl AssociationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `media` as the primary file of `sidecar`.
    ///
    /// A sidecar has at most one primary file; a second primary for the same
    /// sidecar is refused the same way a contested media file is.
    pub fn add_primary(&mut self, sidecar: impl Into<PathBuf>, media: impl Into<PathBuf>) -> Result<(), Collision> {
        let (sidecar, media) = (sidecar.into(), media.into());
        self.check(&sidecar, &media)?;
        if let Some(existing) = self.primary.get(&sidecar) {
            return Err(Collision {
                media: existing.clone(),
                owner: sidecar.clone(),
                attempted: sidecar,
            });
        }
        self.owners.insert(media.clone(), sidecar.clone());
        self.primary.insert(sidecar, media);
        Ok(())
    }

    /// Appends `media` to the extra files of `sidecar`.
    pub fn add_extra(&mut self, sidecar: impl Into<PathBuf>, media: impl Into<PathBuf>) -> Result<(), Collision> {
        let (sidecar, media) = (sidecar.into(), media.into());
        self.check(&sidecar, &media)?;
        self.owners.insert(media.clone(), sidecar.clone());
        self.extras.entry(sidecar).or_default().push(media);
        Ok(())
    }

    fn check(&self, sidecar: &Path, media: &Path) -> Result<(), Collision> {
        match self.owners.get(media) {
            Some(owner) => Err(Collision {
                media: media.to_path_buf(),
                owner: owner.clone(),
                attempted: sidecar.to_path_buf(),
            }),
            None => Ok(()),
        }
    }

    pub fn is_owned(&self, media: impl AsRef<Path>) -> bool {
        self.owners.contains_key(media.as_ref())
    }

    /// The sidecar owning `media`, through either a primary or an extra claim.
    pub fn owner_of(&self, media: impl AsRef<Path>) -> Option<&Path> {
        self.owners.get(media.as_ref()).map(PathBuf::as_path)
    }

    /// The primary media file of `sidecar`.
    pub fn primary_of(&self, sidecar: impl AsRef<Path>) -> Option<&Path> {
        self.primary.get(sidecar.as_ref()).map(PathBuf::as_path)
    }

    /// Whether `media` is owned as a primary file (rather than an extra).
    pub fn is_primary(&self, media: impl AsRef<Path>) -> bool {
        let media = media.as_ref();
        self.owner_of(media).and_then(|sidecar| self.primary_of(sidecar)) == Some(media)
    }

    /// The companion files attached to `sidecar`, in attachment order.
    pub fn extras_of(&self, sidecar: impl AsRef<Path>) -> &[PathBuf] {
        self.extras.get(sidecar.as_ref()).map(Vec::as_slice).unwrap_or_default()
    }

    /// `(sidecar, media)` for every primary association.
    pub fn primaries(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.primary.iter().map(|(s, m)| (s.as_path(), m.as_path()))
    }

    /// `(media, sidecar)` for every owned media file.
    pub fn owners(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.owners.iter().map(|(m, s)| (m.as_path(), s.as_path()))
    }

    /// `(sidecar, extras)` for every sidecar with at least one extra file.
    pub fn extras(&self) -> impl Iterator<Item = (&Path, &[PathBuf])> {
        self.extras.iter().map(|(s, e)| (s.as_path(), e.as_slice()))
    }

    pub fn primary_count(&self) -> usize {
        self.primary.len()
    }

    pub fn extra_count(&self) -> usize {
        self.owners.len() - self.primary.len()
    }
}
