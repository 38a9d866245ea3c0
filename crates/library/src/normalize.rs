//! Derives the media filename a sidecar describes.
//!
//! The sidecar's `title` holds the *original* filename, but the export
//! mangles filenames on the way out. Undoing that is a fixed pipeline whose
//! order matters:
//!
//! 1. [`sanitize`] characters the export refuses to write,
//! 2. [`split_extension`] into stem and extension,
//! 3. [`recover_extension`] when the title has none,
//! 4. [`truncate`] the stem to the 51-character export limit,
//! 5. re-append the sidecar's own [`duplicate_suffix`] to the *truncated* stem.
//!
//! The export truncates the original name first and only then disambiguates
//! duplicates, so the suffix may push the final name past 51 characters.

use crate::consts::{ILLEGAL_CHARS_REGEX, MAX_FILENAME_LENGTH, RECOVERABLE_EXTENSIONS, SUFFIX_REGEX};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// More than one recoverable extension exists for an extensionless title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ambiguous(pub Vec<&'static str>);

/// Replaces every character the export can't write with an underscore.
///
/// ```
/// use sidematch_library::normalize::sanitize;
/// assert_eq!(sanitize("a/b:c?.jpg"), "a_b_c_.jpg");
/// ```
pub fn sanitize(title: &str) -> Cow<'_, str> {
    ILLEGAL_CHARS_REGEX.replace_all(title, "_")
}

/// Splits a filename into stem and extension (extension keeps its dot).
///
/// The extension starts at the last dot, unless that dot is the first
/// character, in which case there is no extension at all.
///
/// ```
/// use sidematch_library::normalize::split_extension;
/// assert_eq!(split_extension("IMG_0001.JPG"), ("IMG_0001", ".JPG"));
/// assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
/// assert_eq!(split_extension(".hidden"), (".hidden", ""));
/// assert_eq!(split_extension("no-extension"), ("no-extension", ""));
/// ```
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(0) | None => (name, ""),
        Some(pos) => name.split_at(pos),
    }
}

/// Tries each of `.jpg`, `.png`, `.gif` and `.jpeg` after `stem`.
///
/// Returns the extension when exactly one candidate `exists`, `None` when
/// none does, and [`Ambiguous`] when several do. Never guesses.
pub fn recover_extension(stem: &str, exists: impl Fn(&str) -> bool) -> Result<Option<&'static str>, Ambiguous> {
    let found: Vec<&'static str> =
        RECOVERABLE_EXTENSIONS.into_iter().filter(|ext| exists(&format!("{stem}{ext}"))).collect();
    match found.len() {
        0 => Ok(None),
        1 => Ok(Some(found[0])),
        _ => Err(Ambiguous(found)),
    }
}

/// Returns the first `max` characters of `s`.
pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((pos, _)) => &s[..pos],
        None => s,
    }
}

/// Cuts `stem` so that `stem + extension` fits the export's filename limit.
///
/// Only the stem loses characters. Lengths are counted in characters, not
/// bytes.
///
/// ```
/// use sidematch_library::normalize::truncate;
/// let stem = "a".repeat(60);
/// assert_eq!(truncate(&stem, ".jpg").len(), 47);
/// assert_eq!(truncate("short", ".jpg"), "short");
/// ```
pub fn truncate<'a>(stem: &'a str, extension: &str) -> &'a str {
    let extension_length = extension.chars().count();
    if stem.chars().count() + extension_length <= MAX_FILENAME_LENGTH {
        return stem;
    }
    truncate_chars(stem, MAX_FILENAME_LENGTH.saturating_sub(extension_length))
}

/// The trailing duplicate-index suffix of a sidecar basename, e.g. `(1)`.
///
/// ```
/// use sidematch_library::normalize::duplicate_suffix;
/// assert_eq!(duplicate_suffix("IMG_0001.JPG(1)"), Some("(1)"));
/// assert_eq!(duplicate_suffix("IMG_0001.JPG(12)"), Some("(12)"));
/// assert_eq!(duplicate_suffix("IMG_0001.JPG"), None);
/// assert_eq!(duplicate_suffix("holiday (best)"), None);
/// ```
pub fn duplicate_suffix(basename: &str) -> Option<&str> {
    if !basename.ends_with(')') {
        return None;
    }
    SUFFIX_REGEX.find(basename).map(|m| m.as_str())
}

/// Runs the whole pipeline, returning the media filename `title` should have
/// been exported as.
///
/// `exists` answers whether a filename exists next to the sidecar; it's only
/// consulted when the title has lost its extension.
pub fn derive_filename(basename: &str, title: &str, exists: impl Fn(&str) -> bool) -> Result<String, Ambiguous> {
    let title = sanitize(title);
    let (stem, mut extension) = split_extension(&title);
    if extension.is_empty()
        && let Some(recovered) = recover_extension(stem, exists)?
    {
        extension = recovered;
    }
    let stem = truncate(stem, extension);
    let suffix = duplicate_suffix(basename).unwrap_or_default();
    Ok(format!("{stem}{suffix}{extension}"))
}

/// [`derive_filename`], resolved against the sidecar's directory.
pub fn derive_candidate(
    dir: &Path,
    basename: &str,
    title: &str,
    exists: impl Fn(&Path) -> bool,
) -> Result<PathBuf, Ambiguous> {
    derive_filename(basename, title, |name| exists(&dir.join(name))).map(|name| dir.join(name))
}
