//! Manifest assembly.
//!
//! Turns slide groups into manifest rows and a copy plan. Assembly does no
//! I/O; [`UploadRun`](super::UploadRun) executes the plan.

use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::debug;

use crate::catalog::AlgorithmCatalog;
use crate::error::ManifestError;
use crate::identity::{CaseIdentityResolver, NameProvider, ParsedSlideName, ResolvedIdentity};
use crate::slide::{SlideFile, SlideGroup};

use super::row::{ManifestRow, FIXED_SPECIMEN};

/// A slide copy queued for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCopy {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Rows and copies produced by one assembly, index-aligned.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub rows: Vec<ManifestRow>,
    pub copies: Vec<PlannedCopy>,
}

impl Assembly {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Fail with `UnknownAlgorithm` if any non-empty group names an algorithm
/// missing from `catalog`. Empty groups are not checked.
pub fn check_algorithms(
    catalog: &AlgorithmCatalog,
    groups: &[SlideGroup],
) -> Result<(), ManifestError> {
    match groups
        .iter()
        .filter(|g| !g.is_empty())
        .find(|g| !catalog.contains(&g.algorithm))
    {
        Some(group) => Err(ManifestError::UnknownAlgorithm(group.algorithm.clone())),
        None => Ok(()),
    }
}

/// Builds manifest rows for a run, owning the run's case map.
pub struct ManifestAssembler<'a, 'l, R, N> {
    catalog: &'a AlgorithmCatalog,
    resolver: CaseIdentityResolver<'l, R, N>,
}

impl<'a, 'l, R: Rng, N: NameProvider> ManifestAssembler<'a, 'l, R, N> {
    pub fn new(catalog: &'a AlgorithmCatalog, resolver: CaseIdentityResolver<'l, R, N>) -> Self {
        Self { catalog, resolver }
    }

    /// Number of distinct cases resolved so far.
    pub fn case_count(&self) -> usize {
        self.resolver.case_count()
    }

    /// Assemble rows for `groups`, queueing each slide for a copy into
    /// `destination`.
    ///
    /// Rows come out in group order, then file order within each group.
    /// Groups without files are skipped. Algorithms are validated for all
    /// groups before any identity is generated.
    pub fn assemble(
        &mut self,
        groups: &[SlideGroup],
        destination: &Path,
    ) -> Result<Assembly, ManifestError> {
        check_algorithms(self.catalog, groups)?;

        let catalog = self.catalog;
        let mut assembly = Assembly::default();

        for group in groups.iter().filter(|g| !g.is_empty()) {
            let test_version = catalog
                .version(&group.algorithm)
                .ok_or_else(|| ManifestError::UnknownAlgorithm(group.algorithm.clone()))?;

            for file in &group.files {
                let generator = self.resolver.generator_mut();
                let parsed =
                    ParsedSlideName::parse_with(&file.file_name, || generator.random_block_id());
                let identity = self.resolver.resolve(&parsed.case_id)?;

                debug!(
                    slide = %file.file_name,
                    case_id = %parsed.case_id,
                    block_id = %parsed.block_id,
                    stain = %parsed.stain,
                    reused = identity.reused,
                    "Assembled manifest row"
                );

                assembly.rows.push(build_row(
                    group,
                    test_version,
                    file,
                    &parsed,
                    identity,
                ));
                assembly.copies.push(PlannedCopy {
                    source: file.path.clone(),
                    destination: destination.join(&file.file_name),
                });
            }
        }

        Ok(assembly)
    }
}

fn build_row(
    group: &SlideGroup,
    test_version: &str,
    file: &SlideFile,
    parsed: &ParsedSlideName,
    identity: ResolvedIdentity,
) -> ManifestRow {
    let ResolvedIdentity {
        patient,
        transaction,
        ..
    } = identity;

    ManifestRow {
        test_name: group.algorithm.clone(),
        test_version: test_version.to_string(),
        test_input_name: parsed.test_input_name(),
        patient_dob: crate::identity::format_date(patient.date_of_birth),
        patient_id: patient.patient_id,
        first_name: patient.first_name,
        last_name: patient.last_name,
        slide_file_name: file.file_name.clone(),
        specimen: FIXED_SPECIMEN.to_string(),
        specimen_type: group.specimen.to_string(),
        accession_id: transaction.accession_id,
        stain: parsed.stain.clone(),
        block_id: parsed.block_id.clone(),
        replace: String::new(),
        case_assignees: transaction.case_assignees,
    }
}
