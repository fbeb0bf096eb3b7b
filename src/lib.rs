//! # Slide Manifest
//!
//! Synthetic upload manifests for a pathology-slide ingestion pipeline.
//!
//! Given slide files grouped by algorithm and specimen type, this library
//! fabricates plausible but fake patient identity and case-tracking fields,
//! assembles one manifest row per slide, writes the manifest CSV, and copies
//! the slides into a dated output folder.
//!
//! ## Features
//!
//! - **File name decomposition**: case ID, block ID and stain from slide names
//! - **Case-level identity reuse**: every slide of a case shares one patient
//! - **Collision avoidance**: generated IDs are checked against a persisted ledger
//! - **Configurable policy**: per-slide or per-case accession IDs, patient-ID or
//!   full-triple collision checks
//! - **Reproducible runs**: all randomness can be seeded
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`slide`] - Slide sources, slide groups and JSON plans
//! - [`identity`] - Name decomposition, identifier generation, ledger, resolver
//! - [`manifest`] - Row assembly, CSV output and end-to-end runs
//! - [`catalog`] - Algorithm name to version table
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use slide_manifest::{
//!     AlgorithmCatalog, DirectorySlideSource, GroupListController, GroupPatch, RunOptions,
//!     SlideSource, Specimen, UploadRun,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = DirectorySlideSource::new("Uploads");
//!     let slides = source.list_available()?;
//!
//!     let mut groups = GroupListController::new();
//!     groups.update_group(
//!         0,
//!         GroupPatch::default()
//!             .files(slides)
//!             .algorithm("AIM-HER2 Breast")
//!             .specimen(Specimen::Biopsy),
//!     );
//!
//!     let catalog = AlgorithmCatalog::default();
//!     let options = RunOptions::new("Processed", "used_ids.csv");
//!     let summary = UploadRun::new(&catalog, options).execute(&groups.snapshot())?;
//!
//!     println!("{} rows in {}", summary.rows.len(), summary.folder.display());
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod identity;
pub mod manifest;
pub mod slide;

// Re-export commonly used types
pub use catalog::{Algorithm, AlgorithmCatalog, DEFAULT_ALGORITHMS};
pub use config::{CatalogConfig, Cli, Command, GenerateConfig, ListConfig, SummaryFormat};
pub use error::{CatalogError, IdentityError, LedgerError, ManifestError, SourceError};
pub use identity::{
    BirthDateRange, CaseIdentityResolver, CaseTransactionIdentity, FakeNameProvider,
    IdentifierGenerator, IdentifierTriple, IdentityPolicy, LedgerCollisionFields, NameProvider,
    ParsedSlideName, PatientIdentity, ResolvedIdentity, TransactionIdentityScope, UsedIdsLedger,
};
pub use manifest::{
    Assembly, ManifestAssembler, ManifestRow, PlannedCopy, RunOptions, UploadRun, UploadSummary,
    MANIFEST_COLUMNS,
};
pub use slide::{
    resolve_slides, DirectorySlideSource, GroupListController, GroupPatch, Plan, PlanGroup,
    SlideFile, SlideGroup, SlideSource, Specimen,
};
