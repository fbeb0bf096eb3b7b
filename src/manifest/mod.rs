//! Manifest assembly and upload runs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │               UploadRun                 │
//! │  ledger load → folder → assemble →      │
//! │  copy slides → write CSV → ledger save  │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │           ManifestAssembler             │
//! │  groups → ManifestRow + PlannedCopy     │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │  ParsedSlideName + CaseIdentityResolver │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Failure Semantics
//!
//! A run is not transactional. If a slide copy fails, slides copied before
//! it stay in the run folder, the manifest is written with their rows, and
//! their identifiers are recorded in the ledger before the error is returned.

mod assembler;
mod row;
mod run;
mod writer;

pub use assembler::{check_algorithms, Assembly, ManifestAssembler, PlannedCopy};
pub use row::{ManifestRow, FIXED_SPECIMEN, MANIFEST_COLUMNS};
pub use run::{RunOptions, UploadRun, UploadSummary};
pub use writer::{
    create_run_folder, manifest_file_name, run_stamp, write_manifest, RUN_FOLDER_PREFIX,
};
