//! Algorithm catalog.
//!
//! Maps an algorithm display name (the manifest's "Test Name") to the
//! version string written in the "Test Version" column. The built-in table
//! can be replaced by a CSV file with a `Name,Version` header.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Built-in algorithm table: (display name, version).
pub const DEFAULT_ALGORITHMS: &[(&str, &str)] = &[
    ("AIM-ER Breast", "1.0.0"),
    ("AIM-HER2 Breast", "1.1.0"),
    ("AIM-Ki-67 Breast", "1.0.0"),
    ("AIM-NASH", "1.0.5"),
    ("AIM-PD-L1 NSCLC", "2.0.2"),
    ("AIM-PR Breast", "1.0.0"),
    ("AIM-TumorCellularity", "2.0.0"),
    ("DeepDx Prostate (RUO)", "2.0.0"),
    ("Manual Review", "Manual Review"),
    ("Paige Prostate Detect", "2.1.1"),
    ("PathAssist Derm", "1.0.0"),
    ("TumorDetect", "1.2.0"),
];

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Algorithm {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Version")]
    pub version: String,
}

/// Ordered algorithm name -> version table.
///
/// Insertion order is kept so listings match the configured table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmCatalog {
    entries: Vec<Algorithm>,
}

impl AlgorithmCatalog {
    /// Build a catalog from entries, rejecting duplicate names.
    pub fn new(entries: Vec<Algorithm>) -> Result<Self, CatalogError> {
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.name == entry.name) {
                return Err(CatalogError::DuplicateAlgorithm(entry.name.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// Load a catalog from a `Name,Version` CSV file.
    pub fn from_csv(path: &Path) -> Result<Self, CatalogError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| CatalogError::Csv {
                path: path.to_path_buf(),
                source: e,
            })?;

        let mut entries = Vec::new();
        for result in reader.deserialize::<Algorithm>() {
            let entry = result.map_err(|e| CatalogError::Csv {
                path: path.to_path_buf(),
                source: e,
            })?;
            if entry.name.is_empty() {
                continue;
            }
            entries.push(entry);
        }

        if entries.is_empty() {
            return Err(CatalogError::Empty {
                path: path.to_path_buf(),
            });
        }

        Self::new(entries)
    }

    /// Load `path` if given, otherwise the built-in table.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::from_csv(path),
            None => Ok(Self::default()),
        }
    }

    /// Look up the version for an algorithm name.
    pub fn version(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.version.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.version(name).is_some()
    }

    pub fn entries(&self) -> &[Algorithm] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AlgorithmCatalog {
    fn default() -> Self {
        Self {
            entries: DEFAULT_ALGORITHMS
                .iter()
                .map(|(name, version)| Algorithm {
                    name: (*name).to_string(),
                    version: (*version).to_string(),
                })
                .collect(),
        }
    }
}
