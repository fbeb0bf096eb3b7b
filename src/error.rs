use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while listing or resolving slide files
#[derive(Debug, Error)]
pub enum SourceError {
    /// The slide folder (or an entry in it) could not be read
    #[error("Failed to read slide location {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A requested slide is neither an existing path nor a listed slide
    #[error("Slide not found: {0}")]
    NotFound(String),
}

/// Errors raised while loading the algorithm catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Failed to read or parse the catalog CSV
    #[error("Failed to read catalog {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The catalog file has no entries
    #[error("Catalog {path} contains no algorithms")]
    Empty { path: PathBuf },

    /// The same algorithm name appears twice
    #[error("Duplicate algorithm in catalog: {0}")]
    DuplicateAlgorithm(String),
}

/// Errors raised while reading or writing the used-identifier ledger
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Failed to read or parse the ledger CSV
    #[error("Failed to read ledger {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Failed to write the ledger CSV
    #[error("Failed to write ledger {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Errors raised while synthesizing identities
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Every attempt produced an identifier that was already in use
    #[error("Identifier space exhausted: no unused {field} after {attempts} attempts")]
    IdentifierSpaceExhausted { field: &'static str, attempts: usize },
}

/// Errors that abort a manifest generation run
#[derive(Debug, Error)]
pub enum ManifestError {
    /// A slide group names an algorithm missing from the catalog
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Copying a slide into the run folder failed
    #[error("Failed to copy {slide} to {destination}: {source}")]
    CopyFailed {
        slide: PathBuf,
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Creating the run folder failed
    #[error("Failed to create output folder {path}: {source}")]
    OutputFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the manifest CSV failed
    #[error("Failed to write manifest {path}: {source}")]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Reading or parsing a plan file failed
    #[error("Invalid plan file {path}: {message}")]
    Plan { path: PathBuf, message: String },

    #[error("Slide source error: {0}")]
    Source(#[from] SourceError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),
}
