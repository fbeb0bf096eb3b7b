//! Run folder and manifest CSV output.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::error::ManifestError;

use super::row::{ManifestRow, MANIFEST_COLUMNS};

/// Prefix of per-run output folders.
pub const RUN_FOLDER_PREFIX: &str = "Upload_";

/// Timestamp embedded in run folder and manifest names.
pub fn run_stamp(at: NaiveDateTime) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}

/// Manifest file name for a run stamp.
pub fn manifest_file_name(stamp: &str) -> String {
    format!("upload_file_{}.csv", stamp)
}

/// Create a fresh `Upload_<stamp>` folder under `base`.
///
/// If that name is taken (two runs in the same second), `_2`, `_3`, ... are
/// appended until an unused name is found. `base` is created if missing.
pub fn create_run_folder(base: &Path, stamp: &str) -> Result<PathBuf, ManifestError> {
    fs::create_dir_all(base).map_err(|e| ManifestError::OutputFolder {
        path: base.to_path_buf(),
        source: e,
    })?;

    let mut suffix = 1u32;
    loop {
        let name = if suffix == 1 {
            format!("{}{}", RUN_FOLDER_PREFIX, stamp)
        } else {
            format!("{}{}_{}", RUN_FOLDER_PREFIX, stamp, suffix)
        };
        let path = base.join(name);

        match fs::create_dir(&path) {
            Ok(()) => return Ok(path),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => suffix += 1,
            Err(e) => {
                return Err(ManifestError::OutputFolder { path, source: e });
            }
        }
    }
}

/// Write `rows` to a manifest CSV at `path`, header first.
pub fn write_manifest(path: &Path, rows: &[ManifestRow]) -> Result<(), ManifestError> {
    let write_err = |source| ManifestError::ManifestWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(write_err)?;

    writer.write_record(MANIFEST_COLUMNS).map_err(write_err)?;
    for row in rows {
        writer.serialize(row).map_err(write_err)?;
    }
    writer
        .flush()
        .map_err(|e| write_err(csv::Error::from(e)))?;

    Ok(())
}
