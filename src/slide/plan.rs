//! JSON upload plans.
//!
//! A plan is the non-interactive way to describe slide groups:
//!
//! ```json
//! {
//!   "groups": [
//!     { "files": ["ABCDEFGHIJKL-001-B1-DAB.svs"], "algorithm": "AIM-HER2 Breast", "specimen": "Biopsy" }
//!   ]
//! }
//! ```
//!
//! File entries are slide names from the slide folder or explicit paths.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ManifestError, SourceError};

use super::{resolve_slides, GroupListController, GroupPatch, SlideSource, Specimen};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub groups: Vec<PlanGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanGroup {
    #[serde(default)]
    pub files: Vec<String>,
    pub algorithm: String,
    #[serde(default)]
    pub specimen: Specimen,
}

impl Plan {
    /// Read a plan from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let plan_err = |message: String| ManifestError::Plan {
            path: path.to_path_buf(),
            message,
        };
        let text = fs::read_to_string(path).map_err(|e| plan_err(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| plan_err(e.to_string()))
    }

    /// Resolve every group's files against `source` and load the groups
    /// into a fresh controller, one controller group per plan group.
    pub fn to_controller<S>(&self, source: &S) -> Result<GroupListController, SourceError>
    where
        S: SlideSource + ?Sized,
    {
        let mut controller = GroupListController::new();

        for (i, group) in self.groups.iter().enumerate() {
            let index = if i == 0 { 0 } else { controller.add_group() };
            let files = resolve_slides(source, &group.files)?;
            controller.update_group(
                index,
                GroupPatch::default()
                    .files(files)
                    .algorithm(group.algorithm.clone())
                    .specimen(group.specimen),
            );
        }

        Ok(controller)
    }
}
