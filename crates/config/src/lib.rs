//! Layered configuration for sidematch.
//!
//! Sources, lowest priority first:
//!
//! 1. built-in defaults;
//! 2. a config file: the one passed explicitly, else `config.toml` in the
//!    platform config directory (`~/.config/sidematch/` on Linux) if present;
//! 3. `SIDEMATCH_*` environment variables, with `__` separating nested keys
//!    (`SIDEMATCH_REPORTS__JSON=out/json.csv`);
//! 4. an explicit root passed by the caller (the `--root` flag).
//!
//! A complete file, with the known override tables, is `config.example.toml`
//! at the repository root. In short:
//!
//! ```toml
//! root = "/mnt/backup/takeout-2024"
//! photos_dir = "Takeout/Google Photos"
//!
//! [reports]
//! json = "json.csv"
//!
//! [overrides.sidecars]
//! "2014-08-01" = "2014-08-01(1).jpg"
//!
//! [overrides.companions]
//! "00100dPORTRAIT_00100_BURST20191126172153427_COVER(2).jpg" = "00100dPORTRAIT_00100_BURST20191126172153427_COVER(1).jpg"
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use sidematch_library::Overrides;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "SIDEMATCH_";
const DEFAULT_PHOTOS_DIR: &str = "Takeout/Google Photos";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory the export was extracted into.
    pub root: PathBuf,
    /// Where the photos live, relative to [`root`](Self::root).
    pub photos_dir: PathBuf,
    pub reports: Reports,
    pub overrides: Overrides,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            photos_dir: PathBuf::from(DEFAULT_PHOTOS_DIR),
            reports: Reports::default(),
            overrides: Overrides::default(),
        }
    }
}
impl Config {
    /// The directory to scan.
    pub fn library_root(&self) -> PathBuf {
        self.root.join(&self.photos_dir)
    }
}

/// Output paths of the three CSV reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reports {
    pub json: PathBuf,
    pub files: PathBuf,
    pub extra: PathBuf,
}
impl Default for Reports {
    fn default() -> Self {
        Self {
            json: PathBuf::from("json.csv"),
            files: PathBuf::from("files.csv"),
            extra: PathBuf::from("extra.csv"),
        }
    }
}

/// `config.toml` in the platform's config directory for sidematch.
pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "sidematch").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Merges every source and validates the result.
///
/// # Errors
/// - [`ErrorKind::NotFound`] if `file` is given but doesn't exist.
/// - [`ErrorKind::UnsupportedFormat`] for an unknown config file extension.
/// - [`ErrorKind::Extract`] if any source has the wrong shape.
/// - [`ErrorKind::MissingRoot`] if no source sets a root.
pub fn load(file: Option<&Path>, root: Option<&Path>) -> Result<Config> {
    let file = match file {
        Some(path) => {
            if !path.is_file() {
                exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
            }
            Some(path.to_path_buf())
        },
        None => default_path().filter(|path| path.is_file()),
    };

    let mut figment = Figment::from(Serialized::defaults(Config::default()));
    if let Some(path) = &file {
        tracing::debug!(path = %path.display(), "Loading config file");
        figment = merge_file(figment, path)?;
    }
    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
    if let Some(root) = root {
        figment = figment.merge(Serialized::default("root", root));
    }

    let config: Config = figment.extract().map_err(|e| ErrorKind::Extract(e.to_string()))?;
    if config.root.as_os_str().is_empty() {
        exn::bail!(ErrorKind::MissingRoot);
    }
    tracing::debug!(root = %config.library_root().display(), "Configuration loaded");
    Ok(config)
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    Ok(match extension.to_ascii_lowercase().as_str() {
        "toml" => figment.merge(Toml::file(path)),
        "yaml" | "yml" => figment.merge(Yaml::file(path)),
        "json" => figment.merge(Json::file(path)),
        other => {
            exn::bail!(ErrorKind::UnsupportedFormat(other.to_string()));
        },
    })
}
