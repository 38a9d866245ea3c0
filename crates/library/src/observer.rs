//! Progress and diagnostics side channel.
//!
//! The pipeline never logs directly; it hands [`Event`]s to an [`Observer`]
//! supplied by the caller. [`TracingObserver`] forwards them to `tracing`,
//! [`Recorder`] keeps them in memory (handy for tests and for callers that
//! want to post-process failures).

use crate::outcome::Failure;
use crate::reconcile::Rule;
use std::path::PathBuf;

/// A stage of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Phase {
    #[display("scanning directories")]
    Scan,
    #[display("matching sidecar files")]
    Match,
    #[display("checking for unmatched files")]
    Reconcile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A phase has begun, and will visit `total` items (zero when unknown).
    Started { phase: Phase, total: usize },
    /// The scanner is listing a directory.
    Directory(PathBuf),
    /// Another sidecar was found; `total` is the running count.
    Discovered { total: usize },
    /// A sidecar was bound to its media file.
    Matched { sidecar: PathBuf, media: PathBuf },
    /// A companion file was attached to the sidecar owning `main`.
    Attached {
        media: PathBuf,
        main: PathBuf,
        sidecar: PathBuf,
        rule: Rule,
    },
    /// A companion rule derived a main file that nothing owns.
    Tried { media: PathBuf, main: PathBuf, rule: Rule },
    Failed(Failure),
    /// End of the primary pass.
    MatchedSidecars { matched: usize, total: usize },
    /// End of the companion pass.
    AttachedExtras { files: usize, sidecars: usize },
}
impl Event {
    pub fn severity(&self) -> Severity {
        match self {
            Self::Directory(_)
            | Self::Discovered { .. }
            | Self::Matched { .. }
            | Self::Attached { .. }
            | Self::Tried { .. } => Severity::Debug,
            Self::Started { .. } | Self::MatchedSidecars { .. } | Self::AttachedExtras { .. } => Severity::Info,
            Self::Failed(_) => Severity::Error,
        }
    }
}

/// Receives [`Event`]s from the pipeline, one method per [`Severity`].
pub trait Observer {
    fn debug(&mut self, event: Event);
    fn info(&mut self, event: Event);
    fn error(&mut self, event: Event);

    /// Dispatches `event` to the method matching its severity.
    fn notify(&mut self, event: Event) {
        match event.severity() {
            Severity::Debug => self.debug(event),
            Severity::Info => self.info(event),
            Severity::Error => self.error(event),
        }
    }
}

/// Forwards events to the `tracing` facade as structured events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn debug(&mut self, event: Event) {
        match event {
            Event::Directory(path) => tracing::debug!(path = %path.display(), "Scanning directory"),
            // One per sidecar; far too chatty for debug.
            Event::Discovered { total } => tracing::trace!(total, "Sidecar discovered"),
            Event::Matched { sidecar, media } => {
                tracing::debug!(sidecar = %sidecar.display(), media = %media.display(), "File found")
            },
            Event::Attached { media, main, sidecar, rule } => tracing::debug!(
                media = %media.display(),
                main = %main.display(),
                sidecar = %sidecar.display(),
                %rule,
                "Extra file attached"
            ),
            Event::Tried { media, main, rule } => {
                tracing::debug!(media = %media.display(), main = %main.display(), %rule, "Main file not matched")
            },
            other => tracing::debug!(event = ?other),
        }
    }

    fn info(&mut self, event: Event) {
        match event {
            Event::Started { phase, total } => tracing::info!(total, "{}", capitalize(&phase.to_string())),
            Event::MatchedSidecars { matched, total } => tracing::info!("Matched {matched} json files out of {total}"),
            Event::AttachedExtras { files, sidecars } => {
                tracing::info!("Matched {files} extra files to {sidecars} json files")
            },
            other => tracing::info!(event = ?other),
        }
    }

    fn error(&mut self, event: Event) {
        match event {
            Event::Failed(failure) => tracing::error!("{failure}"),
            other => tracing::error!(event = ?other),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Keeps every event in memory, in the order received.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    pub events: Vec<Event>,
}
impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> impl Iterator<Item = &Failure> {
        self.events.iter().filter_map(|e| match e {
            Event::Failed(failure) => Some(failure),
            _ => None,
        })
    }
}

impl Observer for Recorder {
    fn debug(&mut self, event: Event) {
        self.events.push(event);
    }

    fn info(&mut self, event: Event) {
        self.events.push(event);
    }

    fn error(&mut self, event: Event) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_dispatches_on_severity() {
        #[derive(Default)]
        struct Counter(usize, usize, usize);
        impl Observer for Counter {
            fn debug(&mut self, _: Event) {
                self.0 += 1;
            }
            fn info(&mut self, _: Event) {
                self.1 += 1;
            }
            fn error(&mut self, _: Event) {
                self.2 += 1;
            }
        }

        let mut counter = Counter::default();
        counter.notify(Event::Discovered { total: 1 });
        counter.notify(Event::Started { phase: Phase::Scan, total: 0 });
        counter.notify(Event::Failed(Failure::UnmatchedFile { media: "/t/a.jpg".into() }));
        counter.notify(Event::MatchedSidecars { matched: 0, total: 0 });
        assert_eq!((counter.0, counter.1, counter.2), (1, 2, 1));
    }

    #[test]
    fn recorder_filters_failures() {
        let mut recorder = Recorder::new();
        recorder.notify(Event::Directory("/t".into()));
        recorder.notify(Event::Failed(Failure::UnmatchedFile { media: "/t/a.jpg".into() }));
        assert_eq!(recorder.events.len(), 2);
        assert_eq!(recorder.failures().count(), 1);
    }

    #[test]
    fn capitalizes_phase_names() {
        assert_eq!(capitalize(&Phase::Reconcile.to_string()), "Checking for unmatched files");
        assert_eq!(capitalize(""), "");
    }
}
