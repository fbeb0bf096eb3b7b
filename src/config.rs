//! Configuration management for Slide Manifest.
//!
//! This module provides the command-line interface:
//! - Subcommands via clap (`generate`, `list`, `catalog`)
//! - Environment variables with `MANIFEST_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use slide_manifest::config::{Cli, Command};
//!
//! let cli = Cli::parse();
//! if let Command::Generate(config) = cli.command {
//!     config.validate()?;
//!     println!("Writing runs under {}", config.output_dir.display());
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `MANIFEST_SLIDES_DIR` - Server folder scanned for `.svs`/`.ndpi` slides
//! - `MANIFEST_OUTPUT_DIR` - Base folder for `Upload_<stamp>` run folders
//! - `MANIFEST_LEDGER` - Used-identifier ledger CSV (default: used_ids.csv)
//! - `MANIFEST_CATALOG` - Algorithm catalog CSV replacing the built-in table
//! - `MANIFEST_TRANSACTION_SCOPE` - per-slide or per-case (default: per-slide)
//! - `MANIFEST_LEDGER_COLLISION` - patient-id-only or full-triple (default: patient-id-only)
//! - `MANIFEST_CASE_ASSIGNEES` - Codes per "Case Assignees" cell, 1 or 2 (default: 1)
//! - `MANIFEST_MAX_ATTEMPTS` - Identifier generation attempts (default: 10000)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::error::ManifestError;
use crate::identity::{
    BirthDateRange, IdentityPolicy, LedgerCollisionFields, TransactionIdentityScope,
    DEFAULT_BIRTH_END_YEAR, DEFAULT_BIRTH_START_YEAR, DEFAULT_MAX_ATTEMPTS,
};
use crate::manifest::RunOptions;
use crate::slide::{Plan, PlanGroup, Specimen};

// =============================================================================
// Default Values
// =============================================================================

/// Default ledger file.
pub const DEFAULT_LEDGER_FILE: &str = "used_ids.csv";

/// Default server folder with incoming slides.
pub const DEFAULT_SLIDES_DIR: &str = "Uploads";

/// Default base folder for run output.
pub const DEFAULT_OUTPUT_DIR: &str = "Processed";

/// Default number of codes in the "Case Assignees" column.
pub const DEFAULT_CASE_ASSIGNEES: u8 = 1;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Slide Manifest - synthetic upload manifests for pathology slides.
///
/// Fabricates patient and case-tracking fields for a set of slide files,
/// writes an upload manifest CSV, and copies the slides into a dated folder.
#[derive(Parser, Debug, Clone)]
#[command(name = "slide-manifest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate an upload manifest and copy the selected slides.
    Generate(GenerateConfig),

    /// List the slides available in the slide folder.
    List(ListConfig),

    /// Print the algorithm catalog.
    Catalog(CatalogConfig),
}

/// Output format for the generate summary.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummaryFormat {
    /// Human-readable table of rows
    #[default]
    Table,
    /// JSON document with the full summary
    Json,
}

/// Arguments for `generate`.
#[derive(Args, Debug, Clone)]
pub struct GenerateConfig {
    // =========================================================================
    // Locations
    // =========================================================================
    /// Folder scanned for slide files when names are given without a path.
    #[arg(long, default_value = DEFAULT_SLIDES_DIR, env = "MANIFEST_SLIDES_DIR")]
    pub slides_dir: PathBuf,

    /// Base folder; each run creates an `Upload_<timestamp>` folder inside.
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR, env = "MANIFEST_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Ledger of identifiers issued by earlier runs.
    #[arg(long, default_value = DEFAULT_LEDGER_FILE, env = "MANIFEST_LEDGER")]
    pub ledger: PathBuf,

    /// Algorithm catalog CSV (`Name,Version`). Uses the built-in table if unset.
    #[arg(long, env = "MANIFEST_CATALOG")]
    pub catalog: Option<PathBuf>,

    // =========================================================================
    // Slide Selection
    // =========================================================================
    /// JSON plan describing one or more slide groups.
    #[arg(long)]
    pub plan: Option<PathBuf>,

    /// Slide name or path for a single ad-hoc group (repeatable).
    #[arg(long = "file", value_name = "NAME|PATH")]
    pub files: Vec<String>,

    /// Algorithm for the ad-hoc group.
    #[arg(long)]
    pub algorithm: Option<String>,

    /// Specimen type for the ad-hoc group.
    #[arg(long, value_enum, default_value_t = Specimen::Tissue)]
    pub specimen: Specimen,

    // =========================================================================
    // Identity Policy
    // =========================================================================
    /// Whether accession ID and case assignees are minted per slide or per case.
    #[arg(long, value_enum, default_value_t = TransactionIdentityScope::PerSlide, env = "MANIFEST_TRANSACTION_SCOPE")]
    pub transaction_scope: TransactionIdentityScope,

    /// Ledger columns that make a generated identity count as used.
    #[arg(long, value_enum, default_value_t = LedgerCollisionFields::PatientIdOnly, env = "MANIFEST_LEDGER_COLLISION")]
    pub ledger_collision: LedgerCollisionFields,

    /// Number of 10-digit codes in the "Case Assignees" column (1 or 2).
    #[arg(long, default_value_t = DEFAULT_CASE_ASSIGNEES, env = "MANIFEST_CASE_ASSIGNEES")]
    pub case_assignees: u8,

    /// Identifier generation attempts before giving up.
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS, env = "MANIFEST_MAX_ATTEMPTS")]
    pub max_attempts: usize,

    /// First year for generated birth dates.
    #[arg(long, default_value_t = DEFAULT_BIRTH_START_YEAR)]
    pub dob_start_year: i32,

    /// Last year for generated birth dates.
    #[arg(long, default_value_t = DEFAULT_BIRTH_END_YEAR)]
    pub dob_end_year: i32,

    /// Seed for all random values, for reproducible output.
    #[arg(long)]
    pub seed: Option<u64>,

    // =========================================================================
    // Output
    // =========================================================================
    /// Summary output format.
    #[arg(long, value_enum, default_value_t = SummaryFormat::Table)]
    pub format: SummaryFormat,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl GenerateConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        match &self.plan {
            Some(_) if !self.files.is_empty() || self.algorithm.is_some() => {
                return Err("--plan cannot be combined with --file or --algorithm".to_string());
            }
            Some(_) => {}
            None => {
                if self.files.is_empty() {
                    return Err(
                        "No slides selected. Pass --plan <FILE> or at least one --file".to_string(),
                    );
                }
                match self.algorithm.as_deref() {
                    None => return Err("--algorithm is required with --file".to_string()),
                    Some(name) if name.trim().is_empty() => {
                        return Err("--algorithm must not be empty".to_string());
                    }
                    Some(_) => {}
                }
            }
        }

        if !(1..=2).contains(&self.case_assignees) {
            return Err("case_assignees must be 1 or 2".to_string());
        }

        if self.max_attempts == 0 {
            return Err("max_attempts must be greater than 0".to_string());
        }

        if self.birth_dates().is_none() {
            return Err(format!(
                "Invalid birth year range {}..={}",
                self.dob_start_year, self.dob_end_year
            ));
        }

        Ok(())
    }

    /// Birth date range from the year options, if valid.
    pub fn birth_dates(&self) -> Option<BirthDateRange> {
        BirthDateRange::years(self.dob_start_year, self.dob_end_year)
    }

    /// Identity policy from the policy options.
    pub fn policy(&self) -> IdentityPolicy {
        IdentityPolicy {
            transaction_scope: self.transaction_scope,
            ledger_collision: self.ledger_collision,
            case_assignee_count: self.case_assignees,
            max_attempts: self.max_attempts,
        }
    }

    /// Run options (call `validate()` first).
    pub fn run_options(&self) -> RunOptions {
        RunOptions::new(&self.output_dir, &self.ledger)
            .with_policy(self.policy())
            .with_birth_dates(self.birth_dates().unwrap_or_default())
            .with_seed(self.seed)
    }

    /// The slide groups to process: the plan file, or one group built from
    /// `--file`/`--algorithm`/`--specimen`.
    pub fn plan(&self) -> Result<Plan, ManifestError> {
        match &self.plan {
            Some(path) => Plan::from_file(path),
            None => Ok(Plan {
                groups: vec![PlanGroup {
                    files: self.files.clone(),
                    algorithm: self.algorithm.clone().unwrap_or_default(),
                    specimen: self.specimen,
                }],
            }),
        }
    }
}

/// Arguments for `list`.
#[derive(Args, Debug, Clone)]
pub struct ListConfig {
    /// Folder scanned for slide files.
    #[arg(long, default_value = DEFAULT_SLIDES_DIR, env = "MANIFEST_SLIDES_DIR")]
    pub slides_dir: PathBuf,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Arguments for `catalog`.
#[derive(Args, Debug, Clone)]
pub struct CatalogConfig {
    /// Algorithm catalog CSV (`Name,Version`). Uses the built-in table if unset.
    #[arg(long, env = "MANIFEST_CATALOG")]
    pub catalog: Option<PathBuf>,
}

// =============================================================================
// Tests
// =============================================================================
