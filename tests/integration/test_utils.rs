//! Shared fixtures for integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use slide_manifest::{
    resolve_slides, AlgorithmCatalog, DirectorySlideSource, IdentityPolicy, ManifestError,
    ManifestRow, RunOptions, SlideGroup, Specimen, UploadRun, UploadSummary,
};

/// Temporary slide folder, output folder and ledger path.
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir(dir.path().join("uploads")).expect("create slide folder");
        Self { dir }
    }

    pub fn slides_dir(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("processed")
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.dir.path().join("used_ids.csv")
    }

    /// Create slide files whose content is their own name.
    pub fn with_slides(self, names: &[&str]) -> Self {
        for name in names {
            fs::write(self.slides_dir().join(name), name.as_bytes()).expect("write slide");
        }
        self
    }

    pub fn source(&self) -> DirectorySlideSource {
        DirectorySlideSource::new(self.slides_dir())
    }

    /// Group of slides from the slide folder, resolved by name.
    pub fn group(&self, names: &[&str], algorithm: &str, specimen: Specimen) -> SlideGroup {
        let requested: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        let files = resolve_slides(&self.source(), &requested).expect("resolve slides");
        SlideGroup::new(files, algorithm, specimen)
    }

    pub fn options(&self, seed: u64) -> RunOptions {
        RunOptions::new(self.output_dir(), self.ledger_path()).with_seed(Some(seed))
    }

    pub fn run(
        &self,
        groups: &[SlideGroup],
        policy: IdentityPolicy,
        seed: u64,
    ) -> Result<UploadSummary, ManifestError> {
        let catalog = AlgorithmCatalog::default();
        let options = self.options(seed).with_policy(policy);
        UploadRun::new(&catalog, options).execute_at(groups, fixed_time())
    }
}

/// Timestamp used for every test run: 2024-03-15 10:30:00.
pub fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 15)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap()
}

/// Read a manifest CSV back into rows.
pub fn read_manifest(path: &Path) -> Vec<ManifestRow> {
    let mut reader = csv::Reader::from_path(path).expect("open manifest");
    reader
        .deserialize()
        .map(|row| row.expect("manifest row"))
        .collect()
}

/// Header line of a CSV file.
pub fn header_line(path: &Path) -> String {
    fs::read_to_string(path)
        .expect("read csv")
        .lines()
        .next()
        .unwrap_or_default()
        .to_string()
}
