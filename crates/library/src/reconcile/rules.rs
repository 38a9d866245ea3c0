//! Companion rules. Each one maps a media file to the path of the "main" file
//! it would belong to, or `None` when the rule doesn't apply. None of them
//! touch the filesystem or the store.

use crate::consts::{MAX_FILENAME_LENGTH, SUFFIX_REGEX};
use crate::normalize::{split_extension, truncate_chars};
use crate::overrides::Overrides;
use std::path::{Path, PathBuf};

const MOTION_PHOTO_TOKEN: &str = "MVIMG";
const EDITED_TOKEN: &str = "-edited";
const LIVE_PHOTO_ENDINGS: [&str; 3] = ["MP", "MP~1", "MP~2"];
const LEGACY_ORIGINAL_PREFIX: &str = "original_";
const JPG: &str = ".jpg";

fn file_name(path: &Path) -> Option<&str> {
    path.file_name()?.to_str()
}

/// A configured companion → main mapping, within the same directory.
pub fn companion_override(path: &Path, overrides: &Overrides) -> Option<PathBuf> {
    overrides.companion(file_name(path)?).map(|main| path.with_file_name(main))
}

/// `PXL_…MVIMG….MP4` belongs to `PXL_…MVIMG….jpg`.
pub fn motion_photo(path: &Path) -> Option<PathBuf> {
    let name = file_name(path)?;
    if !name.contains(MOTION_PHOTO_TOKEN) {
        return None;
    }
    let stem = name.strip_suffix(".MP4").unwrap_or(name);
    Some(path.with_file_name(format!("{stem}{JPG}")))
}

/// `IMG_0001-edited.jpg` belongs to `IMG_0001.jpg`.
pub fn edited(path: &Path) -> Option<PathBuf> {
    let name = file_name(path)?;
    if !name.contains(EDITED_TOKEN) {
        return None;
    }
    Some(path.with_file_name(name.replace(EDITED_TOKEN, "")))
}

/// `PXL_20220101_123456789.MP` belongs to `PXL_20220101_123456789.MP.jpg`.
///
/// The main file's name is subject to the same export limit, so it's cut
/// before `.jpg` is appended. A duplicate-index suffix on the stem moves to
/// the end of the old extension: `PXL_1(1).MP` → `PXL_1.MP(1).jpg`.
pub fn live_photo(path: &Path) -> Option<PathBuf> {
    let name = file_name(path)?;
    if !LIVE_PHOTO_ENDINGS.iter().any(|ending| name.ends_with(ending)) {
        return None;
    }
    let name = match name.chars().count() + JPG.len() > MAX_FILENAME_LENGTH {
        true => truncate_chars(name, MAX_FILENAME_LENGTH - JPG.len()),
        false => name,
    };
    let (stem, extension) = split_extension(name);
    let main = match SUFFIX_REGEX.find(stem) {
        Some(suffix) => format!("{}{extension}{}{JPG}", &stem[..suffix.start()], suffix.as_str()),
        None => format!("{stem}{extension}{JPG}"),
    };
    Some(path.with_file_name(main))
}

/// `original_<uuid>_(1).jpg`, found in legacy exports, belongs to
/// `original_<uuid>_.jpg`.
pub fn legacy_original(path: &Path) -> Option<PathBuf> {
    let name = file_name(path)?;
    let is_original = path
        .components()
        .any(|c| c.as_os_str().to_str().is_some_and(|c| c.starts_with(LEGACY_ORIGINAL_PREFIX)));
    if !is_original || !name.ends_with(").jpg") {
        return None;
    }
    let stem = name.strip_suffix(JPG)?;
    let stem = SUFFIX_REGEX.replace(stem, "");
    Some(path.with_file_name(format!("{stem}{JPG}")))
}
