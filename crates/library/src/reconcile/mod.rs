//! Second pass: attach companion files to the sidecar of their main file.
//!
//! Burst shots, motion photos and edits are exported as separate files with
//! no sidecar of their own. Each unowned media file is run through
//! [`Rule::CASCADE`]; the first rule whose derived main file is already owned
//! attaches it as an extra of that owner. A rule that derives an unowned main
//! file doesn't count, and the cascade moves on to the next rule.

mod rules;

pub use rules::{companion_override, edited, legacy_original, live_photo, motion_photo};

use crate::Context;
use crate::observer::{Event, Observer, Phase};
use crate::outcome::Failure;
use crate::overrides::Overrides;
use crate::store::Collision;
use derive_more::Display;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// A companion rule, in cascade order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Rule {
    #[display("companion override")]
    CompanionOverride,
    #[display("motion photo")]
    MotionPhoto,
    #[display("edited")]
    Edited,
    #[display("live photo")]
    LivePhoto,
    #[display("legacy original")]
    LegacyOriginal,
}
impl Rule {
    pub const CASCADE: [Rule; 5] = [
        Self::CompanionOverride,
        Self::MotionPhoto,
        Self::Edited,
        Self::LivePhoto,
        Self::LegacyOriginal,
    ];

    /// The main file this rule would attach `path` to, if it applies at all.
    pub fn candidate(self, path: &Path, overrides: &Overrides) -> Option<PathBuf> {
        match self {
            Self::CompanionOverride => companion_override(path, overrides),
            Self::MotionPhoto => motion_photo(path),
            Self::Edited => edited(path),
            Self::LivePhoto => live_photo(path),
            Self::LegacyOriginal => legacy_original(path),
        }
    }
}

/// Attaches every unowned media file it can, and reports the rest as
/// [`Failure::UnmatchedFile`].
#[instrument(level = "debug", skip_all)]
pub fn reconcile(ctx: &mut Context, observer: &mut dyn Observer) {
    let unowned: Vec<PathBuf> = ctx.scan.media.iter().filter(|m| !ctx.store.is_owned(m)).cloned().collect();
    observer.notify(Event::Started {
        phase: Phase::Reconcile,
        total: unowned.len(),
    });

    for media in unowned {
        match attach(ctx, &media, observer) {
            Ok(Some((main, sidecar, rule))) => observer.notify(Event::Attached { media, main, sidecar, rule }),
            Ok(None) => observer.notify(Event::Failed(Failure::UnmatchedFile { media })),
            Err(collision) => observer.notify(Event::Failed(Failure::DuplicateCollision(collision))),
        }
    }

    observer.notify(Event::AttachedExtras {
        files: ctx.store.extra_count(),
        sidecars: ctx.store.extras().count(),
    });
}

/// Runs the cascade for one file, returning the main file, its owner and the
/// rule that made the attachment.
///
/// The first owned candidate is final: if the store then refuses the claim,
/// the [`Collision`] is returned rather than trying later rules.
fn attach(
    ctx: &mut Context,
    media: &Path,
    observer: &mut dyn Observer,
) -> Result<Option<(PathBuf, PathBuf, Rule)>, Collision> {
    for rule in Rule::CASCADE {
        let Some(main) = rule.candidate(media, &ctx.overrides) else {
            continue;
        };
        let Some(owner) = ctx.store.owner_of(&main).map(Path::to_path_buf) else {
            observer.notify(Event::Tried {
                media: media.to_path_buf(),
                main,
                rule,
            });
            continue;
        };
        // `media` was unowned when the pass started and only this call claims
        // it, so a collision here means the store and the scan disagree.
        ctx.store.add_extra(&owner, media)?;
        return Ok(Some((main, owner, rule)));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::Recorder;
    use crate::scan::Scan;
    use crate::store::AssociationStore;
    use rstest::rstest;

    fn context(media: &[&str], primaries: &[(&str, &str)], overrides: Overrides) -> Context {
        let sidecars = primaries.iter().map(|(sidecar, _)| *sidecar);
        let scan = Scan::from_paths("/t", media.iter().copied().chain(sidecars));
        let mut ctx = Context::new(scan, overrides);
        for (sidecar, main) in primaries {
            ctx.store.add_primary(*sidecar, *main).unwrap();
        }
        ctx
    }

    #[test]
    fn test_motion_photo_is_attached() {
        let mut ctx = context(
            &["/t/PXL_2022_MVIMG.jpg", "/t/PXL_2022_MVIMG.MP4"],
            &[("/t/PXL_2022_MVIMG.jpg.json", "/t/PXL_2022_MVIMG.jpg")],
            Overrides::default(),
        );
        let mut recorder = Recorder::new();
        reconcile(&mut ctx, &mut recorder);

        assert_eq!(ctx.store().extras_of("/t/PXL_2022_MVIMG.jpg.json"), [PathBuf::from("/t/PXL_2022_MVIMG.MP4")]);
        assert_eq!(ctx.store().owner_of("/t/PXL_2022_MVIMG.MP4"), Some(Path::new("/t/PXL_2022_MVIMG.jpg.json")));
        assert!(recorder.events.contains(&Event::Attached {
            media: "/t/PXL_2022_MVIMG.MP4".into(),
            main: "/t/PXL_2022_MVIMG.jpg".into(),
            sidecar: "/t/PXL_2022_MVIMG.jpg.json".into(),
            rule: Rule::MotionPhoto,
        }));
        assert!(recorder.events.contains(&Event::AttachedExtras { files: 1, sidecars: 1 }));
        assert_eq!(recorder.failures().count(), 0);
    }

    #[test]
    fn test_unowned_candidate_falls_through() {
        // `-edited` is removed first, but `IMG_1-edited.MP` → `IMG_1.MP` isn't
        // owned; the live photo rule then finds `IMG_1-edited.MP.jpg`.
        let mut ctx = context(
            &["/t/IMG_1-edited.MP", "/t/IMG_1-edited.MP.jpg"],
            &[("/t/IMG_1-edited.MP.jpg.json", "/t/IMG_1-edited.MP.jpg")],
            Overrides::default(),
        );
        let mut recorder = Recorder::new();
        reconcile(&mut ctx, &mut recorder);

        assert!(recorder.events.contains(&Event::Tried {
            media: "/t/IMG_1-edited.MP".into(),
            main: "/t/IMG_1.MP".into(),
            rule: Rule::Edited,
        }));
        assert!(recorder.events.iter().any(|e| matches!(e, Event::Attached { rule: Rule::LivePhoto, .. })));
        assert_eq!(ctx.store().extra_count(), 1);
    }

    #[test]
    fn test_companion_override_comes_first() {
        let overrides = Overrides {
            companions: [("BURST_COV(2).jpg".to_string(), "BURST_COV(1).jpg".to_string())].into(),
            ..Overrides::default()
        };
        let mut ctx = context(
            &["/t/BURST_COV(1).jpg", "/t/BURST_COV(2).jpg"],
            &[("/t/BURST_COV.jpg(1).json", "/t/BURST_COV(1).jpg")],
            overrides,
        );
        let mut recorder = Recorder::new();
        reconcile(&mut ctx, &mut recorder);
        assert!(recorder.events.iter().any(|e| matches!(e, Event::Attached { rule: Rule::CompanionOverride, .. })));
        assert_eq!(ctx.store().extras_of("/t/BURST_COV.jpg(1).json").len(), 1);
    }

    #[test]
    fn test_no_forward_chaining() {
        // `b-edited-edited.jpg` → `b.jpg` in one step; there's no second hop
        // through the also-unowned `b-edited.jpg`.
        let mut ctx = context(&["/t/b-edited.jpg", "/t/b-edited-edited.jpg"], &[], Overrides::default());
        let mut recorder = Recorder::new();
        reconcile(&mut ctx, &mut recorder);
        assert_eq!(ctx.store(), &AssociationStore::new());
        assert_eq!(recorder.failures().count(), 2);
    }

    #[test]
    fn test_unmatched_file_is_reported() {
        let mut ctx = context(&["/t/a.jpg", "/t/stray.png"], &[("/t/a.jpg.json", "/t/a.jpg")], Overrides::default());
        let mut recorder = Recorder::new();
        reconcile(&mut ctx, &mut recorder);
        assert_eq!(
            recorder.failures().collect::<Vec<_>>(),
            vec![&Failure::UnmatchedFile { media: "/t/stray.png".into() }]
        );
        assert!(recorder.events.contains(&Event::AttachedExtras { files: 0, sidecars: 0 }));
    }

    #[test]
    fn test_owned_files_are_skipped() {
        let mut ctx = context(&["/t/a-edited.jpg"], &[("/t/a-edited.jpg.json", "/t/a-edited.jpg")], Overrides::default());
        let mut recorder = Recorder::new();
        reconcile(&mut ctx, &mut recorder);
        assert!(recorder.events.contains(&Event::Started { phase: Phase::Reconcile, total: 0 }));
        assert_eq!(ctx.store().extra_count(), 0);
    }

    /// Every main file in `mains` is owned by its own sidecar (`<main>.json`),
    /// so each rule that applies to `media` finds an owner; only the earliest
    /// rule in the cascade may attach it.
    #[rstest]
    #[case::override_before_motion_photo("/t/X_MVIMG.MP4", &["/t/cover.jpg", "/t/X_MVIMG.jpg"], "/t/cover.jpg", Rule::CompanionOverride)]
    #[case::motion_photo_before_edited("/t/X_MVIMG-edited.MP4", &["/t/X_MVIMG-edited.jpg", "/t/X_MVIMG.MP4"], "/t/X_MVIMG-edited.jpg", Rule::MotionPhoto)]
    #[case::motion_photo_before_live_photo("/t/MVIMG_1.MP", &["/t/MVIMG_1.MP.jpg"], "/t/MVIMG_1.MP.jpg", Rule::MotionPhoto)]
    #[case::motion_photo_before_legacy("/t/original_x/MVIMG(1).jpg", &["/t/original_x/MVIMG(1).jpg.jpg", "/t/original_x/MVIMG.jpg"], "/t/original_x/MVIMG(1).jpg.jpg", Rule::MotionPhoto)]
    #[case::edited_before_live_photo("/t/A-edited.MP", &["/t/A.MP", "/t/A-edited.MP.jpg"], "/t/A.MP", Rule::Edited)]
    #[case::edited_before_legacy("/t/original_x/A-edited(1).jpg", &["/t/original_x/A(1).jpg", "/t/original_x/A-edited.jpg"], "/t/original_x/A(1).jpg", Rule::Edited)]
    fn test_first_owned_rule_wins(#[case] media: &str, #[case] mains: &[&str], #[case] expected: &str, #[case] rule: Rule) {
        let overrides = Overrides {
            companions: [("X_MVIMG.MP4".to_string(), "cover.jpg".to_string())].into(),
            ..Overrides::default()
        };
        let sidecars: Vec<String> = mains.iter().map(|main| format!("{main}.json")).collect();
        let primaries: Vec<(&str, &str)> = sidecars.iter().map(String::as_str).zip(mains.iter().copied()).collect();
        let files: Vec<&str> = std::iter::once(media).chain(mains.iter().copied()).collect();
        let mut ctx = context(&files, &primaries, overrides);
        let mut recorder = Recorder::new();
        reconcile(&mut ctx, &mut recorder);

        let owner = PathBuf::from(format!("{expected}.json"));
        assert_eq!(ctx.store().owner_of(media), Some(owner.as_path()));
        assert!(recorder.events.contains(&Event::Attached {
            media: media.into(),
            main: expected.into(),
            sidecar: owner,
            rule,
        }));
        assert_eq!(ctx.store().extra_count(), 1);
    }

    #[test]
    fn test_refused_claim_is_returned() {
        // Already owned, as if the scan and store were out of step.
        let mut ctx = context(
            &["/t/a.jpg", "/t/a-edited.jpg"],
            &[("/t/a.jpg.json", "/t/a.jpg"), ("/t/a-edited.jpg.json", "/t/a-edited.jpg")],
            Overrides::default(),
        );
        let before = ctx.store().clone();
        let collision = attach(&mut ctx, Path::new("/t/a-edited.jpg"), &mut Recorder::new()).unwrap_err();
        assert_eq!(
            collision,
            Collision {
                media: "/t/a-edited.jpg".into(),
                owner: "/t/a-edited.jpg.json".into(),
                attempted: "/t/a.jpg.json".into(),
            }
        );
        assert_eq!(ctx.store(), &before);
    }
}
