//! Slide groups and the mutable group list a front end edits.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::SlideFile;

/// Specimen category chosen for a slide group.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum Specimen {
    #[default]
    #[serde(alias = "tissue")]
    Tissue,
    #[serde(alias = "biopsy")]
    Biopsy,
}

impl Specimen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Specimen::Tissue => "Tissue",
            Specimen::Biopsy => "Biopsy",
        }
    }
}

impl fmt::Display for Specimen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of selection: slides sharing an algorithm and specimen type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideGroup {
    pub files: Vec<SlideFile>,
    pub algorithm: String,
    pub specimen: Specimen,
}

impl SlideGroup {
    pub fn new(files: Vec<SlideFile>, algorithm: impl Into<String>, specimen: Specimen) -> Self {
        Self {
            files,
            algorithm: algorithm.into(),
            specimen,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Partial update for a group. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct GroupPatch {
    pub files: Option<Vec<SlideFile>>,
    pub algorithm: Option<String>,
    pub specimen: Option<Specimen>,
}

impl GroupPatch {
    pub fn files(mut self, files: Vec<SlideFile>) -> Self {
        self.files = Some(files);
        self
    }

    pub fn algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = Some(algorithm.into());
        self
    }

    pub fn specimen(mut self, specimen: Specimen) -> Self {
        self.specimen = Some(specimen);
        self
    }
}

/// Editable list of slide groups owned by the front end.
///
/// Starts with a single empty group. The manifest core only ever sees the
/// result of [`snapshot`](Self::snapshot).
#[derive(Debug, Clone)]
pub struct GroupListController {
    groups: Vec<SlideGroup>,
}

impl GroupListController {
    pub fn new() -> Self {
        Self {
            groups: vec![SlideGroup::default()],
        }
    }

    /// Append an empty group and return its index.
    pub fn add_group(&mut self) -> usize {
        self.groups.push(SlideGroup::default());
        self.groups.len() - 1
    }

    /// Apply a patch to the group at `index`.
    ///
    /// An empty file list in the patch does not clear a previous selection.
    /// Returns `false` if there is no group at `index`.
    pub fn update_group(&mut self, index: usize, patch: GroupPatch) -> bool {
        let Some(group) = self.groups.get_mut(index) else {
            return false;
        };

        if let Some(files) = patch.files {
            if !files.is_empty() {
                group.files = files;
            }
        }
        if let Some(algorithm) = patch.algorithm {
            group.algorithm = algorithm;
        }
        if let Some(specimen) = patch.specimen {
            group.specimen = specimen;
        }
        true
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Copy of the current groups, in order.
    pub fn snapshot(&self) -> Vec<SlideGroup> {
        self.groups.clone()
    }
}

impl Default for GroupListController {
    fn default() -> Self {
        Self::new()
    }
}
