//! End-to-end upload run.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::catalog::AlgorithmCatalog;
use crate::error::ManifestError;
use crate::identity::{
    BirthDateRange, CaseIdentityResolver, FakeNameProvider, IdentifierGenerator, IdentityPolicy,
    UsedIdsLedger,
};
use crate::slide::SlideGroup;

use super::assembler::{check_algorithms, Assembly, ManifestAssembler};
use super::row::ManifestRow;
use super::writer::{create_run_folder, manifest_file_name, run_stamp, write_manifest};

/// Settings for an upload run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Base folder receiving `Upload_<stamp>` run folders
    pub output_dir: PathBuf,

    /// Used-identifier ledger CSV
    pub ledger_path: PathBuf,

    pub policy: IdentityPolicy,

    pub birth_dates: BirthDateRange,

    /// Seed for every random draw; `None` seeds from OS entropy
    pub seed: Option<u64>,
}

impl RunOptions {
    pub fn new(output_dir: impl Into<PathBuf>, ledger_path: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ledger_path: ledger_path.into(),
            policy: IdentityPolicy::default(),
            birth_dates: BirthDateRange::default(),
            seed: None,
        }
    }

    pub fn with_policy(mut self, policy: IdentityPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_birth_dates(mut self, birth_dates: BirthDateRange) -> Self {
        self.birth_dates = birth_dates;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct UploadSummary {
    pub folder: PathBuf,
    pub manifest_path: PathBuf,
    pub rows: Vec<ManifestRow>,
    /// Distinct case IDs in this run
    pub cases: usize,
    pub ledger_entries_before: usize,
    pub ledger_entries_after: usize,
}

/// One manifest generation run.
///
/// # Example
///
/// ```no_run
/// use slide_manifest::{AlgorithmCatalog, RunOptions, SlideFile, SlideGroup, Specimen, UploadRun};
///
/// let catalog = AlgorithmCatalog::default();
/// let options = RunOptions::new("processed", "used_ids.csv");
/// let groups = vec![SlideGroup::new(
///     vec![SlideFile::from_path("uploads/ABCDEFGHIJKL-001-B1-DAB.svs").unwrap()],
///     "AIM-HER2 Breast",
///     Specimen::Biopsy,
/// )];
///
/// let summary = UploadRun::new(&catalog, options).execute(&groups)?;
/// println!("Manifest written to {}", summary.manifest_path.display());
/// # Ok::<(), slide_manifest::ManifestError>(())
/// ```
pub struct UploadRun<'a> {
    catalog: &'a AlgorithmCatalog,
    options: RunOptions,
}

impl<'a> UploadRun<'a> {
    pub fn new(catalog: &'a AlgorithmCatalog, options: RunOptions) -> Self {
        Self { catalog, options }
    }

    /// Run now, stamping outputs with the local time.
    pub fn execute(&self, groups: &[SlideGroup]) -> Result<UploadSummary, ManifestError> {
        self.execute_at(groups, Local::now().naive_local())
    }

    /// Run with an explicit timestamp for folder and manifest names.
    pub fn execute_at(
        &self,
        groups: &[SlideGroup],
        at: NaiveDateTime,
    ) -> Result<UploadSummary, ManifestError> {
        check_algorithms(self.catalog, groups)?;

        let mut ledger = UsedIdsLedger::load(&self.options.ledger_path)?;
        let ledger_entries_before = ledger.len();

        let stamp = run_stamp(at);
        let folder = create_run_folder(&self.options.output_dir, &stamp)?;
        info!(folder = %folder.display(), "Created run folder");

        let (generator, names) = match self.options.seed {
            Some(seed) => (
                IdentifierGenerator::with_birth_dates(
                    StdRng::seed_from_u64(seed),
                    self.options.birth_dates,
                ),
                FakeNameProvider::seeded(seed.wrapping_add(1)),
            ),
            None => (
                IdentifierGenerator::with_birth_dates(
                    StdRng::from_entropy(),
                    self.options.birth_dates,
                ),
                FakeNameProvider::from_entropy(),
            ),
        };

        let (Assembly { mut rows, copies }, cases) = {
            let resolver = CaseIdentityResolver::new(generator, names, &ledger, self.options.policy);
            let mut assembler = ManifestAssembler::new(self.catalog, resolver);
            let assembly = assembler.assemble(groups, &folder)?;
            (assembly, assembler.case_count())
        };

        let mut failure = None;
        for (index, copy) in copies.iter().enumerate() {
            match fs::copy(&copy.source, &copy.destination) {
                Ok(bytes) => {
                    debug!(slide = %copy.source.display(), bytes, "Copied slide");
                }
                Err(e) => {
                    warn!(
                        slide = %copy.source.display(),
                        error = %e,
                        completed = index,
                        "Slide copy failed, stopping run"
                    );
                    rows.truncate(index);
                    failure = Some(ManifestError::CopyFailed {
                        slide: copy.source.clone(),
                        destination: copy.destination.clone(),
                        source: e,
                    });
                    break;
                }
            }
        }

        let manifest_path = folder.join(manifest_file_name(&stamp));
        let persisted = self.persist(&manifest_path, &rows, &mut ledger);

        if let Some(err) = failure {
            // The copy failure is the error reported to the caller
            if let Err(later) = persisted {
                error!(
                    error = %later,
                    rows = rows.len(),
                    "Failed to record rows copied before the copy failure"
                );
            }
            return Err(err);
        }
        persisted?;

        info!(
            manifest = %manifest_path.display(),
            rows = rows.len(),
            cases,
            ledger_entries = ledger.len(),
            "Upload manifest generated"
        );

        Ok(UploadSummary {
            folder,
            manifest_path,
            rows,
            cases,
            ledger_entries_before,
            ledger_entries_after: ledger.len(),
        })
    }

    /// Write the manifest, then record its rows in the ledger and save it.
    fn persist(
        &self,
        manifest_path: &Path,
        rows: &[ManifestRow],
        ledger: &mut UsedIdsLedger,
    ) -> Result<(), ManifestError> {
        write_manifest(manifest_path, rows)?;

        for row in rows {
            ledger.record(row.triple());
        }
        ledger.save(&self.options.ledger_path)?;
        Ok(())
    }
}
