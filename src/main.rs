//! Slide Manifest - synthetic upload manifests for pathology slides.
//!
//! This binary parses the command line and runs the selected subcommand.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slide_manifest::{
    config::{CatalogConfig, Cli, Command, GenerateConfig, ListConfig, SummaryFormat},
    AlgorithmCatalog, DirectorySlideSource, SlideSource, UploadRun, UploadSummary,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(config) => run_generate(config),
        Command::List(config) => run_list(config),
        Command::Catalog(config) => run_catalog(config),
    }
}

// =============================================================================
// Generate Command
// =============================================================================

fn run_generate(config: GenerateConfig) -> ExitCode {
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let catalog = match AlgorithmCatalog::load_or_default(config.catalog.as_deref()) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let plan = match config.plan() {
        Ok(plan) => plan,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let source = DirectorySlideSource::new(&config.slides_dir);
    let groups = match plan.to_controller(&source) {
        Ok(controller) => controller.snapshot(),
        Err(e) => {
            error!("{}", e);
            error!("  Slide folder: {}", config.slides_dir.display());
            return ExitCode::FAILURE;
        }
    };

    let options = config.run_options();

    info!("Configuration:");
    info!("  Slide folder: {}", config.slides_dir.display());
    info!("  Output folder: {}", options.output_dir.display());
    info!("  Ledger: {}", options.ledger_path.display());
    info!(
        "  Policy: transaction scope {:?}, ledger collision {:?}, {} case assignee(s)",
        options.policy.transaction_scope,
        options.policy.ledger_collision,
        options.policy.case_assignee_count
    );
    info!(
        "  Groups: {} ({} slide(s))",
        groups.len(),
        groups.iter().map(|g| g.files.len()).sum::<usize>()
    );

    let summary = match UploadRun::new(&catalog, options).execute(&groups) {
        Ok(summary) => summary,
        Err(e) => {
            error!("Manifest generation failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match config.format {
        SummaryFormat::Table => print_summary_table(&summary),
        SummaryFormat::Json => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize summary: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}

/// Print the run outcome and its rows as an aligned table.
fn print_summary_table(summary: &UploadSummary) {
    println!("Upload CSV & slide copies generated in folder: {}", summary.folder.display());
    println!("Manifest: {}", summary.manifest_path.display());
    println!(
        "Rows: {}  Cases: {}  Ledger entries: {} -> {}",
        summary.rows.len(),
        summary.cases,
        summary.ledger_entries_before,
        summary.ledger_entries_after
    );

    if summary.rows.is_empty() {
        return;
    }

    let name_width = summary
        .rows
        .iter()
        .map(|r| r.slide_file_name.len())
        .max()
        .unwrap_or(0)
        .max("Slide File Name".len());

    println!();
    println!(
        "{:<name_width$}  {:<10}  {:<24}  {:<10}  {:<10}  {:<10}  {}",
        "Slide File Name", "Patient Id", "Name", "Dob", "Accession", "Block", "Stain",
    );
    println!("{}", "─".repeat(name_width + 90));
    for row in &summary.rows {
        println!(
            "{:<name_width$}  {:<10}  {:<24}  {:<10}  {:<10}  {:<10}  {}",
            row.slide_file_name,
            row.patient_id,
            format!("{} {}", row.first_name, row.last_name),
            row.patient_dob,
            row.accession_id,
            row.block_id,
            row.stain,
        );
    }
}

// =============================================================================
// List Command
// =============================================================================

fn run_list(config: ListConfig) -> ExitCode {
    if config.verbose {
        init_logging(true);
    }

    let source = DirectorySlideSource::new(&config.slides_dir);

    println!("Slides in {}:", source.root().display());
    println!("─────────────────");

    match source.list_available() {
        Ok(slides) => {
            if slides.is_empty() {
                println!("  (no slides found)");
            } else {
                for slide in &slides {
                    println!("  {}", slide.file_name);
                }
                println!();
                println!("Total: {} slide(s)", slides.len());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("  Error listing slides: {}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Catalog Command
// =============================================================================

fn run_catalog(config: CatalogConfig) -> ExitCode {
    let catalog = match AlgorithmCatalog::load_or_default(config.catalog.as_deref()) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let width = catalog
        .entries()
        .iter()
        .map(|a| a.name.len())
        .max()
        .unwrap_or(0);

    for algorithm in catalog.entries() {
        println!("{:<width$}  {}", algorithm.name, algorithm.version);
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
///
/// Logs go to stderr so `--format json` output stays parseable.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "slide_manifest=debug"
    } else {
        "slide_manifest=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
