//! Slide selection layer.
//!
//! This module turns "which slides go into this upload" into plain data the
//! manifest core can consume. The core never browses folders or talks to a
//! UI; it only sees a snapshot of [`SlideGroup`]s whose files are already
//! resolved to `(path, file name)` pairs.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐   ┌──────────────────────┐
//! │ DirectorySlideSource │   │   explicit paths     │
//! │ (.svs/.ndpi folder)  │   │ (/data/x.svs, ./y)   │
//! └──────────┬───────────┘   └──────────┬───────────┘
//!            └────────────┬─────────────┘
//!                         ▼
//! ┌─────────────────────────────────────────┐
//! │           SlideSource Trait             │
//! │  list_available() -> [SlideFile]        │
//! └────────────────────┬────────────────────┘
//!                      │  resolve_slides()
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │         GroupListController             │
//! │  add_group / update_group / snapshot    │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//!               [SlideGroup] -> manifest assembler
//! ```

mod group;
mod local_source;
mod plan;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SourceError;

pub use group::{GroupListController, GroupPatch, SlideGroup, Specimen};
pub use local_source::{is_slide_file, DirectorySlideSource, SLIDE_EXTENSIONS};
pub use plan::{Plan, PlanGroup};

/// A slide file resolved to a concrete location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlideFile {
    /// Where the slide can be read from
    pub path: PathBuf,

    /// Bare file name, with extension, as written to the manifest
    pub file_name: String,
}

impl SlideFile {
    /// Create a slide file from a path, taking the file name from its last
    /// component. Returns `None` for paths without a file name (e.g. `..`).
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let file_name = path.file_name()?.to_string_lossy().into_owned();
        Some(Self { path, file_name })
    }
}

/// Capability that lists the slides available for selection.
///
/// Implementations may scan a server-side folder or simply echo a set of
/// user-supplied paths; the manifest core only needs the resolved pairs.
pub trait SlideSource {
    /// List the available slides in a stable order.
    fn list_available(&self) -> Result<Vec<SlideFile>, SourceError>;
}

/// Resolve requested slide names against a source.
///
/// A request that is absolute or has more than one path component (e.g.
/// `/data/x.svs`, `./x.svs`) and names an existing file is taken as an
/// explicit path. A bare file name must match a slide listed by `source`,
/// even when a file of that name exists in the working directory.
/// Order of the result follows the order of `requested`.
pub fn resolve_slides<S>(source: &S, requested: &[String]) -> Result<Vec<SlideFile>, SourceError>
where
    S: SlideSource + ?Sized,
{
    if requested.is_empty() {
        return Ok(Vec::new());
    }

    let mut available: Option<Vec<SlideFile>> = None;
    let mut resolved = Vec::with_capacity(requested.len());

    for name in requested {
        let as_path = Path::new(name);
        if is_explicit_path(as_path) && as_path.is_file() {
            if let Some(file) = SlideFile::from_path(as_path) {
                resolved.push(file);
                continue;
            }
        }

        if available.is_none() {
            available = Some(source.list_available()?);
        }
        let found = available
            .as_ref()
            .and_then(|slides| slides.iter().find(|s| s.file_name == *name));

        match found {
            Some(file) => resolved.push(file.clone()),
            None => return Err(SourceError::NotFound(name.clone())),
        }
    }

    Ok(resolved)
}

fn is_explicit_path(path: &Path) -> bool {
    path.is_absolute() || path.components().count() > 1
}
