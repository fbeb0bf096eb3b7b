//! Manifest row type.

use serde::{Deserialize, Serialize};

use crate::identity::IdentifierTriple;

/// Manifest CSV header, in column order.
pub const MANIFEST_COLUMNS: [&str; 15] = [
    "Test Name",
    "Test Version",
    "Test Input Name",
    "Patient Dob",
    "Patient Id",
    "First Name",
    "Last Name",
    "Slide File Name",
    "Specimen",
    "Specimen Type",
    "Accession Id",
    "Stain",
    "Block Id",
    "Replace",
    "Case Assignees",
];

/// Value of the "Specimen" column for every row.
pub const FIXED_SPECIMEN: &str = "Tissue";

/// One manifest line, one per slide.
///
/// Field order matches [`MANIFEST_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRow {
    #[serde(rename = "Test Name")]
    pub test_name: String,
    #[serde(rename = "Test Version")]
    pub test_version: String,
    #[serde(rename = "Test Input Name")]
    pub test_input_name: String,
    #[serde(rename = "Patient Dob")]
    pub patient_dob: String,
    #[serde(rename = "Patient Id")]
    pub patient_id: String,
    #[serde(rename = "First Name")]
    pub first_name: String,
    #[serde(rename = "Last Name")]
    pub last_name: String,
    #[serde(rename = "Slide File Name")]
    pub slide_file_name: String,
    #[serde(rename = "Specimen")]
    pub specimen: String,
    #[serde(rename = "Specimen Type")]
    pub specimen_type: String,
    #[serde(rename = "Accession Id")]
    pub accession_id: String,
    #[serde(rename = "Stain")]
    pub stain: String,
    #[serde(rename = "Block Id")]
    pub block_id: String,
    /// Reserved, always blank
    #[serde(rename = "Replace")]
    pub replace: String,
    #[serde(rename = "Case Assignees")]
    pub case_assignees: String,
}

impl ManifestRow {
    /// Ledger triple carried by this row.
    pub fn triple(&self) -> IdentifierTriple {
        IdentifierTriple::new(
            self.patient_id.clone(),
            self.accession_id.clone(),
            self.case_assignees.clone(),
        )
    }
}
