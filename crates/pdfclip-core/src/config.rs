use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::PdfClipError;
use crate::extraction::pdftotext::PdftotextExtractor;
use crate::preview::{PdftoppmRenderer, DEFAULT_PREVIEW_DPI};
use crate::resolve::DegeneratePolicy;

/// External tools and rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    pub pdftotext: PathBuf,
    pub pdftoppm: PathBuf,
    pub preview_dpi: u32,
    pub degenerate_regions: DegeneratePolicy,
}

impl Default for ToolConfig {
    fn default() -> Self {
        ToolConfig {
            pdftotext: PathBuf::from("pdftotext"),
            pdftoppm: PathBuf::from("pdftoppm"),
            preview_dpi: DEFAULT_PREVIEW_DPI,
            degenerate_regions: DegeneratePolicy::default(),
        }
    }
}

impl ToolConfig {
    pub fn extractor(&self) -> PdftotextExtractor {
        PdftotextExtractor::with_binary(&self.pdftotext)
    }

    pub fn renderer(&self) -> PdftoppmRenderer {
        PdftoppmRenderer::with_binary(&self.pdftoppm, self.preview_dpi)
    }
}

/// Load a config from a JSON file. Missing fields take their defaults.
pub fn load_config(path: &Path) -> Result<ToolConfig, PdfClipError> {
    let content = std::fs::read_to_string(path).map_err(|e| PdfClipError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_config(&content, path)
}

/// Parse a config from a JSON string.
pub fn parse_config(json: &str, source: &Path) -> Result<ToolConfig, PdfClipError> {
    let config: ToolConfig = serde_json::from_str(json).map_err(|e| PdfClipError::ConfigLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    if config.preview_dpi == 0 {
        return Err(PdfClipError::ConfigLoad {
            path: source.to_path_buf(),
            reason: "preview_dpi must be positive".into(),
        });
    }
    Ok(config)
}
