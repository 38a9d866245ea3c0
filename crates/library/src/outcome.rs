//! Non-fatal outcomes of a matching run.
//!
//! A [`Failure`] is recorded and reported, then processing moves on to the next
//! sidecar or media file. Fatal problems use [`Error`](crate::error::Error).

use crate::store::Collision;
use derive_more::Display;
use std::path::PathBuf;

/// Every way a single sidecar or media file can fail to be matched.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Failure {
    /// A candidate filename was derived but no such media file exists.
    #[display("file missing: {} from: {}", candidate.display(), sidecar.display())]
    FileMissing { sidecar: PathBuf, candidate: PathBuf },
    /// The title had no extension and more than one recoverable extension exists on disk.
    #[display("ambiguous name: {title} ({}) from: {}", extensions.join(", "), sidecar.display())]
    AmbiguousExtension {
        sidecar: PathBuf,
        title: String,
        extensions: Vec<&'static str>,
    },
    /// The sidecar isn't valid JSON, or doesn't have a string `title`.
    #[display("invalid sidecar: {} ({reason})", sidecar.display())]
    ParseError { sidecar: PathBuf, reason: String },
    /// The media file is already owned by another sidecar.
    #[display("{_0}")]
    DuplicateCollision(Collision),
    /// The media file is owned by nothing after both passes.
    #[display("unmatched file: {}", media.display())]
    UnmatchedFile { media: PathBuf },
}

/// Terminal state of a sidecar after the primary pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum SidecarStatus {
    #[display("matched")]
    Matched,
    #[display("file missing")]
    FileMissing,
    #[display("ambiguous extension")]
    AmbiguousExtension,
    #[display("parse error")]
    ParseError,
    /// The derived media file was already claimed by an earlier sidecar.
    #[display("collided")]
    Collided,
}
impl SidecarStatus {
    /// The status a sidecar ends in after `failure`. `None` for failures
    /// only a media file can have.
    pub(crate) fn from_failure(failure: &Failure) -> Option<Self> {
        match failure {
            Failure::FileMissing { .. } => Some(Self::FileMissing),
            Failure::AmbiguousExtension { .. } => Some(Self::AmbiguousExtension),
            Failure::ParseError { .. } => Some(Self::ParseError),
            Failure::DuplicateCollision(_) => Some(Self::Collided),
            Failure::UnmatchedFile { .. } => None,
        }
    }
}

/// Terminal state of a file discovered by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum MediaStatus {
    /// Owned by a sidecar through the primary matcher.
    #[display("primary")]
    Primary,
    /// Attached to another file's sidecar as a companion.
    #[display("extra")]
    Extra,
    #[display("unmatched")]
    Unmatched,
    /// An aggregate JSON file dropped at scan time.
    #[display("ignored")]
    Ignored,
}

/// Counts per terminal state, for the end-of-run report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub sidecars: usize,
    pub matched: usize,
    pub file_missing: usize,
    pub ambiguous: usize,
    pub parse_errors: usize,
    pub collisions: usize,
    pub media: usize,
    pub primary: usize,
    pub extra: usize,
    pub unmatched: usize,
    pub ignored: usize,
}
impl Summary {
    pub(crate) fn count_sidecar(&mut self, status: SidecarStatus) {
        self.sidecars += 1;
        match status {
            SidecarStatus::Matched => self.matched += 1,
            SidecarStatus::FileMissing => self.file_missing += 1,
            SidecarStatus::AmbiguousExtension => self.ambiguous += 1,
            SidecarStatus::ParseError => self.parse_errors += 1,
            SidecarStatus::Collided => self.collisions += 1,
        }
    }

    pub(crate) fn count_media(&mut self, status: MediaStatus) {
        match status {
            MediaStatus::Primary => self.primary += 1,
            MediaStatus::Extra => self.extra += 1,
            MediaStatus::Unmatched => self.unmatched += 1,
            // Ignored entries never made it into the media set.
            MediaStatus::Ignored => {
                self.ignored += 1;
                return;
            },
        }
        self.media += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn failure_display() {
        let failure = Failure::FileMissing {
            sidecar: PathBuf::from("/t/a.jpg.json"),
            candidate: PathBuf::from("/t/a.jpg"),
        };
        assert_eq!(failure.to_string(), "file missing: /t/a.jpg from: /t/a.jpg.json");
        let failure = Failure::AmbiguousExtension {
            sidecar: PathBuf::from("/t/a.json"),
            title: "a".to_string(),
            extensions: vec![".jpg", ".png"],
        };
        assert_eq!(failure.to_string(), "ambiguous name: a (.jpg, .png) from: /t/a.json");
    }

    #[test]
    fn collision_maps_to_collided() {
        let failure = Failure::DuplicateCollision(Collision {
            media: Path::new("/t/a.jpg").into(),
            owner: Path::new("/t/a.jpg.json").into(),
            attempted: Path::new("/t/a.json").into(),
        });
        assert_eq!(SidecarStatus::from_failure(&failure), Some(SidecarStatus::Collided));
    }

    #[test]
    fn unmatched_file_has_no_sidecar_status() {
        let failure = Failure::UnmatchedFile {
            media: PathBuf::from("/t/stray.png"),
        };
        assert_eq!(SidecarStatus::from_failure(&failure), None);
    }

    #[test]
    fn summary_counts_ignored_separately() {
        let mut summary = Summary::default();
        summary.count_media(MediaStatus::Primary);
        summary.count_media(MediaStatus::Unmatched);
        summary.count_media(MediaStatus::Ignored);
        assert_eq!(summary.media, 2);
        assert_eq!(summary.ignored, 1);
    }
}
