//! Used-identifier ledger.
//!
//! A CSV file with the header `PatientId,AccessionId,CaseAssignees` holding
//! every identifier triple issued by earlier runs. It is loaded once at the
//! start of a run and saved once at the end.
//!
//! A missing file means "no history" and loads as an empty ledger. Triples
//! emitted by a run are appended with [`UsedIdsLedger::record`] before the
//! ledger is saved, so later runs see them.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::LedgerError;

/// Ledger CSV header, in column order.
pub const LEDGER_COLUMNS: [&str; 3] = ["PatientId", "AccessionId", "CaseAssignees"];

/// One issued (patient, accession, assignees) combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentifierTriple {
    #[serde(rename = "PatientId")]
    pub patient_id: String,
    #[serde(rename = "AccessionId")]
    pub accession_id: String,
    #[serde(rename = "CaseAssignees")]
    pub case_assignees: String,
}

impl IdentifierTriple {
    pub fn new(
        patient_id: impl Into<String>,
        accession_id: impl Into<String>,
        case_assignees: impl Into<String>,
    ) -> Self {
        Self {
            patient_id: patient_id.into(),
            accession_id: accession_id.into(),
            case_assignees: case_assignees.into(),
        }
    }
}

/// In-memory ledger table with lookup indexes.
#[derive(Debug, Clone, Default)]
pub struct UsedIdsLedger {
    /// Rows in file order
    entries: Vec<IdentifierTriple>,

    /// Index over the PatientId column
    patient_ids: HashSet<String>,

    /// Index over whole rows
    triples: HashSet<IdentifierTriple>,
}

impl UsedIdsLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the ledger at `path`, or an empty ledger if the file is absent.
    ///
    /// Duplicate rows in the file are kept so that saving an untouched
    /// ledger reproduces it.
    pub fn load(path: &Path) -> Result<Self, LedgerError> {
        if !path.exists() {
            info!(path = %path.display(), "No ledger file, starting without history");
            return Ok(Self::new());
        }

        let read_err = |source| LedgerError::Read {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(read_err)?;

        let mut ledger = Self::new();
        for result in reader.deserialize::<IdentifierTriple>() {
            let triple = result.map_err(read_err)?;
            ledger.push(triple);
        }

        debug!(path = %path.display(), entries = ledger.len(), "Loaded ledger");
        Ok(ledger)
    }

    /// Write the ledger to `path`. The header is written even when empty.
    pub fn save(&self, path: &Path) -> Result<(), LedgerError> {
        let write_err = |source| LedgerError::Write {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(write_err)?;

        writer.write_record(LEDGER_COLUMNS).map_err(write_err)?;
        for entry in &self.entries {
            writer.serialize(entry).map_err(write_err)?;
        }
        writer
            .flush()
            .map_err(|e| write_err(csv::Error::from(e)))?;

        debug!(path = %path.display(), entries = self.len(), "Saved ledger");
        Ok(())
    }

    /// Append a triple. Returns `false` (and changes nothing) if the exact
    /// triple is already present.
    pub fn record(&mut self, triple: IdentifierTriple) -> bool {
        if self.triples.contains(&triple) {
            return false;
        }
        self.push(triple);
        true
    }

    fn push(&mut self, triple: IdentifierTriple) {
        self.patient_ids.insert(triple.patient_id.clone());
        self.triples.insert(triple.clone());
        self.entries.push(triple);
    }

    pub fn contains_patient_id(&self, patient_id: &str) -> bool {
        self.patient_ids.contains(patient_id)
    }

    pub fn contains_triple(&self, triple: &IdentifierTriple) -> bool {
        self.triples.contains(triple)
    }

    pub fn entries(&self) -> &[IdentifierTriple] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
