//! Slide file name decomposition.
//!
//! Slide names follow a loose `<case>-<part>-<block>-<stain...>.<ext>`
//! convention. Only the block and stain come from hyphen splitting; the
//! case ID is a plain 12-character prefix.

/// Number of leading characters that form the case ID.
pub const CASE_ID_LEN: usize = 12;

/// Stain used when the name carries no stain segments.
pub const DEFAULT_STAIN: &str = "H&E";

/// Case / block / stain parts of a slide file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSlideName {
    /// First 12 characters of the extension-less name (fewer if shorter)
    pub case_id: String,

    /// Third hyphen segment, or a generated fallback
    pub block_id: String,

    /// Segments from the fourth onward joined by `-`, or [`DEFAULT_STAIN`]
    pub stain: String,
}

impl ParsedSlideName {
    /// Decompose `file_name`.
    ///
    /// `fallback_block_id` is called only when the name has fewer than
    /// three hyphen segments.
    pub fn parse_with<F>(file_name: &str, fallback_block_id: F) -> Self
    where
        F: FnOnce() -> String,
    {
        let base = strip_extension(file_name);
        let parts: Vec<&str> = base.split('-').collect();

        let case_id: String = base.chars().take(CASE_ID_LEN).collect();

        let block_id = match parts.get(2) {
            Some(block) => (*block).to_string(),
            None => fallback_block_id(),
        };

        let stain = if parts.len() > 3 {
            parts[3..].join("-")
        } else {
            DEFAULT_STAIN.to_string()
        };

        Self {
            case_id,
            block_id,
            stain,
        }
    }

    /// Value of the manifest's "Test Input Name" column.
    pub fn test_input_name(&self) -> String {
        format!("{}_slides", self.stain)
    }
}

/// Remove the last extension from a file name.
///
/// Leading dots are not treated as an extension separator, so `.hidden`
/// stays `.hidden` and `archive.tar.svs` becomes `archive.tar`.
pub fn strip_extension(file_name: &str) -> &str {
    let leading_dots = file_name.len() - file_name.trim_start_matches('.').len();
    match file_name[leading_dots..].rfind('.') {
        Some(pos) => &file_name[..leading_dots + pos],
        None => file_name,
    }
}
