use crate::consts::SIDECAR_EXTENSION;
use crate::primary::error::{ErrorKind, Result};
use serde::Deserialize;
use std::borrow::Cow;
use std::fs;
use std::path::Path;

/// The only part of a sidecar the matcher cares about. Everything else
/// (timestamps, geodata, people…) is ignored.
#[derive(Debug, Deserialize)]
struct Sidecar {
    /// The filename the media had when it was uploaded.
    title: String,
}

/// The sidecar's filename without the trailing `.json`.
pub(crate) fn basename(path: &Path) -> Cow<'_, str> {
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    match name {
        Cow::Borrowed(n) => Cow::Borrowed(n.strip_suffix(SIDECAR_EXTENSION).unwrap_or(n)),
        Cow::Owned(n) => Cow::Owned(n.strip_suffix(SIDECAR_EXTENSION).unwrap_or(&n).to_string()),
    }
}

pub(crate) fn read(path: &Path) -> Result<Vec<u8>> {
    Ok(fs::read(path).map_err(|source| ErrorKind::Read {
        path: path.to_path_buf(),
        source,
    })?)
}

/// Extracts `title` from sidecar JSON. Fails on malformed JSON, a missing
/// title, or a title that isn't a string.
pub(crate) fn parse_title(bytes: &[u8]) -> std::result::Result<String, serde_json::Error> {
    serde_json::from_slice::<Sidecar>(bytes).map(|sidecar| sidecar.title)
}
