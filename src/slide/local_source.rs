//! Filesystem-backed slide source.
//!
//! [`DirectorySlideSource`] scans a server-side upload folder for slide
//! files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::SourceError;

use super::{SlideFile, SlideSource};

/// Slide file extensions picked up when scanning a folder.
pub const SLIDE_EXTENSIONS: &[&str] = &[".svs", ".ndpi"];

/// Check if a file name has a supported slide extension.
pub fn is_slide_file(name: &str) -> bool {
    let name_lower = name.to_lowercase();
    SLIDE_EXTENSIONS.iter().any(|ext| name_lower.ends_with(ext))
}

/// Lists the slide files directly inside one folder (not recursive).
#[derive(Debug, Clone)]
pub struct DirectorySlideSource {
    root: PathBuf,
}

impl DirectorySlideSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the scanned folder.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SlideSource for DirectorySlideSource {
    fn list_available(&self) -> Result<Vec<SlideFile>, SourceError> {
        let io_err = |source| SourceError::Io {
            path: self.root.clone(),
            source,
        };

        let mut slides = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if !is_slide_file(&file_name) {
                continue;
            }
            if !entry.file_type().map_err(io_err)?.is_file() {
                continue;
            }
            slides.push(SlideFile {
                path: entry.path(),
                file_name,
            });
        }

        // read_dir order is platform dependent
        slides.sort_by(|a, b| a.file_name.cmp(&b.file_name));

        debug!(root = %self.root.display(), count = slides.len(), "Scanned slide folder");
        Ok(slides)
    }
}
