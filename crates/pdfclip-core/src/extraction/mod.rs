pub mod pdftotext;

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;
use crate::region::Region;

/// Size of a page in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width_pt: f64,
    pub height_pt: f64,
}

/// Trait for first-page region extraction backends.
///
/// Clipping is per character: a word that straddles the region border
/// contributes only the characters inside it.
pub trait RegionExtractor: Send + Sync {
    /// Size of page 1 in points.
    fn page_size(&self, pdf_bytes: &[u8]) -> Result<PageSize, ExtractionError>;

    /// Text inside `region` on page 1. Never mutates the input.
    fn extract(&self, pdf_bytes: &[u8], region: &Region) -> Result<String, ExtractionError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Normalize raw text-layer output: page breaks and blank lines dropped,
/// trailing whitespace removed per line, the whole trimmed.
pub fn normalize_text(raw: &str) -> String {
    raw.split(['\n', '\u{c}'])
        .map(|line| line.trim_end())
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_drops_blank_lines_and_form_feed() {
        let raw = "Invoice No. 42  \n\nDue 2024-05-01\n\u{c}";
        assert_eq!(normalize_text(raw), "Invoice No. 42\nDue 2024-05-01");
    }

    #[test]
    fn test_normalize_empty_output() {
        assert_eq!(normalize_text("\u{c}"), "");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_normalize_keeps_leading_indent_of_inner_lines() {
        assert_eq!(normalize_text("  a\n   b\n"), "a\n   b");
    }
}
