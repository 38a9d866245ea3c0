use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

/// Filenames written by the Takeout export never exceed this many characters.
pub const MAX_FILENAME_LENGTH: usize = 51;

/// Extensions tried, in order, when a sidecar title has lost its extension.
pub const RECOVERABLE_EXTENSIONS: [&str; 4] = [".jpg", ".png", ".gif", ".jpeg"];

/// Aggregate JSON files that describe albums or the account rather than a
/// single media file. Duplicate-indexed variants (`metadata(1).json`) are
/// ignored too.
pub const IGNORED_SIDECARS: [&str; 4] = [
    "print-subscriptions",
    "shared_album_comments",
    "user-generated-memory-titles",
    "metadata",
];

pub(crate) const SIDECAR_EXTENSION: &str = ".json";

// Duplicate-index suffix, e.g. the `(1)` in `IMG_0001(1).jpg`.
regex!(SUFFIX_REGEX, r"\(\d+\)$");
// Characters the export replaces with an underscore.
regex!(ILLEGAL_CHARS_REGEX, r#"[\\/:*?"<>|%&]"#);
