//! CSV reports of a finished run.
//!
//! Three views of the same [`AssociationStore`]:
//!
//! - [`Report::JsonToFile`]: one row per primary association.
//! - [`Report::FileToJson`]: the inverse, covering extras too.
//! - [`Report::JsonToFiles`]: one row per sidecar with extras, each extra in
//!   its own field.
//!
//! Every report starts with a `"sep=,"` line so spreadsheet applications pick
//! the right delimiter, then an unquoted header row. Fields are always
//! double-quoted, with embedded quotes doubled, and every line ends in `\n`.
//! Rows follow the store's path order, so reports are stable across runs.

pub mod error;

use crate::error::{ErrorKind, Result};
use derive_more::Display;
use exn::ResultExt;
use sidematch_library::AssociationStore;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::instrument;

const SEPARATOR_LINE: &str = "\"sep=,\"";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Report {
    #[display("json to file")]
    JsonToFile,
    #[display("file to json")]
    FileToJson,
    #[display("json to files")]
    JsonToFiles,
}
impl Report {
    pub const ALL: [Report; 3] = [Self::JsonToFile, Self::FileToJson, Self::JsonToFiles];

    pub fn header(self) -> &'static str {
        match self {
            Self::JsonToFile => "Json,File",
            Self::FileToJson => "File,Json",
            Self::JsonToFiles => "Json,Files",
        }
    }

    /// Writes the full report, separator line included.
    pub fn write_to(self, store: &AssociationStore, mut writer: impl Write) -> io::Result<()> {
        writeln!(writer, "{SEPARATOR_LINE}")?;
        writeln!(writer, "{}", self.header())?;
        match self {
            Self::JsonToFile => {
                for (sidecar, media) in store.primaries() {
                    write_row(&mut writer, [sidecar, media])?;
                }
            },
            Self::FileToJson => {
                for (media, sidecar) in store.owners() {
                    write_row(&mut writer, [media, sidecar])?;
                }
            },
            Self::JsonToFiles => {
                for (sidecar, extras) in store.extras() {
                    write_row(&mut writer, std::iter::once(sidecar).chain(extras.iter().map(PathBuf::as_path)))?;
                }
            },
        }
        writer.flush()
    }
}

/// Where each report goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Targets {
    pub json: PathBuf,
    pub files: PathBuf,
    pub extra: PathBuf,
}
impl Targets {
    pub fn path(&self, report: Report) -> &Path {
        match report {
            Report::JsonToFile => &self.json,
            Report::FileToJson => &self.files,
            Report::JsonToFiles => &self.extra,
        }
    }
}

/// Writes all three reports, overwriting whatever is already there.
///
/// # Errors
/// The first report that can't be created or written stops the export;
/// reports already written are left in place.
pub fn export(store: &AssociationStore, targets: &Targets) -> Result<()> {
    for report in Report::ALL {
        export_one(store, report, targets.path(report))?;
    }
    Ok(())
}

#[instrument(level = "debug", skip(store))]
fn export_one(store: &AssociationStore, report: Report, path: &Path) -> Result<()> {
    tracing::info!(path = %path.display(), %report, "Exporting csv");
    let file = File::create(path).or_raise(|| ErrorKind::Create(path.to_path_buf()))?;
    report
        .write_to(store, BufWriter::new(file))
        .or_raise(|| ErrorKind::Write(path.to_path_buf()))
}

fn write_row<'a>(writer: &mut impl Write, fields: impl IntoIterator<Item = &'a Path>) -> io::Result<()> {
    let row: Vec<String> = fields.into_iter().map(|field| quote(&field.to_string_lossy())).collect();
    writeln!(writer, "{}", row.join(","))
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    fn store() -> AssociationStore {
        let mut store = AssociationStore::new();
        store.add_primary("/t/IMG_001.json", "/t/IMG_001.JPG").unwrap();
        store.add_primary("/t/PXL_MVIMG.jpg.json", "/t/PXL_MVIMG.jpg").unwrap();
        store.add_extra("/t/PXL_MVIMG.jpg.json", "/t/PXL_MVIMG.MP4").unwrap();
        store.add_extra("/t/PXL_MVIMG.jpg.json", "/t/PXL_MVIMG-edited.jpg").unwrap();
        store
    }

    fn render(report: Report, store: &AssociationStore) -> String {
        let mut buffer = Vec::new();
        report.write_to(store, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[rstest]
    #[case::json_to_file(
        Report::JsonToFile,
        concat!(
            "\"sep=,\"\n",
            "Json,File\n",
            "\"/t/IMG_001.json\",\"/t/IMG_001.JPG\"\n",
            "\"/t/PXL_MVIMG.jpg.json\",\"/t/PXL_MVIMG.jpg\"\n",
        )
    )]
    #[case::file_to_json(
        Report::FileToJson,
        concat!(
            "\"sep=,\"\n",
            "File,Json\n",
            "\"/t/IMG_001.JPG\",\"/t/IMG_001.json\"\n",
            "\"/t/PXL_MVIMG-edited.jpg\",\"/t/PXL_MVIMG.jpg.json\"\n",
            "\"/t/PXL_MVIMG.MP4\",\"/t/PXL_MVIMG.jpg.json\"\n",
            "\"/t/PXL_MVIMG.jpg\",\"/t/PXL_MVIMG.jpg.json\"\n",
        )
    )]
    #[case::json_to_files(
        Report::JsonToFiles,
        concat!(
            "\"sep=,\"\n",
            "Json,Files\n",
            "\"/t/PXL_MVIMG.jpg.json\",\"/t/PXL_MVIMG.MP4\",\"/t/PXL_MVIMG-edited.jpg\"\n",
        )
    )]
    fn test_report_format(#[case] report: Report, #[case] expected: &str) {
        assert_eq!(render(report, &store()), expected);
    }

    #[test]
    fn test_empty_store_has_header_only() {
        assert_eq!(render(Report::JsonToFiles, &AssociationStore::new()), "\"sep=,\"\nJson,Files\n");
    }

    #[test]
    fn test_quotes_are_doubled() {
        assert_eq!(quote(r#"say "cheese".jpg"#), r#""say ""cheese"".jpg""#);
        let mut store = AssociationStore::new();
        store.add_primary("/t/a,b.json", "/t/a,b").unwrap();
        assert!(render(Report::JsonToFile, &store).ends_with("\"/t/a,b.json\",\"/t/a,b\"\n"));
    }

    #[test]
    fn test_export_writes_every_report() {
        let temp_dir = tempfile::tempdir().unwrap();
        let targets = Targets {
            json: temp_dir.path().join("json.csv"),
            files: temp_dir.path().join("files.csv"),
            extra: temp_dir.path().join("extra.csv"),
        };
        fs::write(&targets.json, "stale").unwrap();
        export(&store(), &targets).unwrap();
        for report in Report::ALL {
            let contents = fs::read_to_string(targets.path(report)).unwrap();
            assert_eq!(contents, render(report, &store()));
        }
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("nope/json.csv");
        let targets = Targets {
            json: missing.clone(),
            files: temp_dir.path().join("files.csv"),
            extra: temp_dir.path().join("extra.csv"),
        };
        let err = export(&store(), &targets).unwrap_err();
        assert_eq!(*err, ErrorKind::Create(missing));
        assert!(!targets.files.exists());
    }
}
