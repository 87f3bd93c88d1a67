//! Raster previews of page 1, used to draw a region instead of typing it.

use std::ffi::OsStr;
use std::io::Cursor;
use std::path::PathBuf;

use tracing::debug;

use crate::error::ExtractionError;
use crate::extraction::pdftotext::{classify_failure, run_tool, write_temp_pdf};

/// Resolution previews are rendered at: 2 pixels per point.
pub const DEFAULT_PREVIEW_DPI: u32 = 144;

/// A raster rendering of a document's first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub width_px: u32,
    pub height_px: u32,
    /// Resolution the page was rasterized at, when known.
    pub dpi: Option<u32>,
    /// Encoded PNG, when the preview was rendered here.
    pub png: Option<Vec<u8>>,
}

impl PreviewImage {
    /// A preview known only by its pixel size, e.g. one rendered by a client.
    pub fn from_dimensions(width_px: u32, height_px: u32) -> Self {
        PreviewImage {
            width_px,
            height_px,
            dpi: None,
            png: None,
        }
    }

    /// Wrap PNG bytes, reading the pixel size from the IHDR chunk.
    pub fn from_png(png_bytes: Vec<u8>, dpi: Option<u32>) -> Result<Self, ExtractionError> {
        let (width_px, height_px) = {
            let decoder = png::Decoder::new(Cursor::new(png_bytes.as_slice()));
            let reader = decoder
                .read_info()
                .map_err(|e| ExtractionError::UnexpectedOutput(format!("preview PNG: {e}")))?;
            let info = reader.info();
            (info.width, info.height)
        };
        Ok(PreviewImage {
            width_px,
            height_px,
            dpi,
            png: Some(png_bytes),
        })
    }
}

/// Renders the first page of a document to a [`PreviewImage`].
///
/// Implementations must scale the page uniformly per axis with no margins,
/// cropping or rotation relative to its point space; canvas coordinates are
/// mapped back to points under that assumption.
pub trait PreviewRenderer: Send + Sync {
    fn render_first_page(&self, pdf_bytes: &[u8]) -> Result<PreviewImage, ExtractionError>;
}

/// Preview renderer using pdftoppm (from poppler-utils).
pub struct PdftoppmRenderer {
    binary: PathBuf,
    dpi: u32,
}

impl PdftoppmRenderer {
    pub fn new() -> Self {
        Self::with_binary("pdftoppm", DEFAULT_PREVIEW_DPI)
    }

    pub fn with_binary(binary: impl Into<PathBuf>, dpi: u32) -> Self {
        PdftoppmRenderer {
            binary: binary.into(),
            dpi,
        }
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }
}

impl Default for PdftoppmRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewRenderer for PdftoppmRenderer {
    fn render_first_page(&self, pdf_bytes: &[u8]) -> Result<PreviewImage, ExtractionError> {
        let tmpfile = write_temp_pdf(pdf_bytes)?;
        let out_dir = tempfile::tempdir()?;
        let out_root = out_dir.path().join("preview");
        let dpi = self.dpi.to_string();

        let mut args: Vec<&OsStr> = ["-f", "1", "-l", "1", "-r", dpi.as_str(), "-png", "-singlefile"]
            .into_iter()
            .map(OsStr::new)
            .collect();
        args.push(tmpfile.path().as_os_str());
        args.push(out_root.as_os_str());

        let output = run_tool(&self.binary, "pdftoppm", &args)?;
        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(classify_failure("pdftoppm", code, stderr));
        }

        // -singlefile writes <root>.png without a page suffix
        let png_bytes = std::fs::read(out_root.with_extension("png"))?;
        let preview = PreviewImage::from_png(png_bytes, Some(self.dpi))?;
        debug!(
            width = preview.width_px,
            height = preview.height_px,
            dpi = self.dpi,
            "rendered preview"
        );
        Ok(preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_png(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, width, height);
            encoder.set_color(png::ColorType::Grayscale);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer
                .write_image_data(&vec![255u8; (width * height) as usize])
                .unwrap();
        }
        buf
    }

    #[test]
    fn test_from_png_reads_dimensions() {
        let preview = PreviewImage::from_png(encode_png(20, 28), Some(144)).unwrap();
        assert_eq!(preview.width_px, 20);
        assert_eq!(preview.height_px, 28);
        assert_eq!(preview.dpi, Some(144));
        assert!(preview.png.is_some());
    }

    #[test]
    fn test_from_png_rejects_garbage() {
        let err = PreviewImage::from_png(b"not a png".to_vec(), None).unwrap_err();
        assert!(matches!(err, ExtractionError::UnexpectedOutput(_)));
    }

    #[test]
    fn test_missing_pdftoppm() {
        let renderer = PdftoppmRenderer::with_binary("/nonexistent/pdfclip-pdftoppm", 72);
        let err = renderer.render_first_page(b"%PDF-1.4").unwrap_err();
        assert!(matches!(err, ExtractionError::ToolNotFound { ref tool } if tool == "pdftoppm"));
    }
}
