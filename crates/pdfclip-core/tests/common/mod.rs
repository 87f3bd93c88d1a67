//! Mock backend shared by the integration tests.
//!
//! Document bytes drive its behaviour: `corrupt` fails as malformed, `empty`
//! has no pages, anything else is UTF-8 text laid out as one line per `|`
//! segment, starting at (110, 110) with 20pt line spacing. Every character,
//! spaces included, is a 6pt by 12pt cell; a character is inside a region
//! when the centre of its cell is.

#![allow(dead_code)]

use std::sync::Mutex;

use pdfclip_core::batch::Document;
use pdfclip_core::error::ExtractionError;
use pdfclip_core::extraction::{PageSize, RegionExtractor};
use pdfclip_core::preview::{PreviewImage, PreviewRenderer};
use pdfclip_core::Region;

pub struct MockExtractor {
    pub page: PageSize,
    pub calls: Mutex<Vec<String>>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::with_page(595.0, 842.0)
    }

    pub fn with_page(width_pt: f64, height_pt: f64) -> Self {
        MockExtractor {
            page: PageSize {
                width_pt,
                height_pt,
            },
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn open(&self, pdf_bytes: &[u8]) -> Result<String, ExtractionError> {
        let content = String::from_utf8_lossy(pdf_bytes).to_string();
        self.calls.lock().unwrap().push(content.clone());

        match content.as_str() {
            "corrupt" => Err(ExtractionError::MalformedDocument(
                "Couldn't find trailer dictionary".into(),
            )),
            "empty" => Err(ExtractionError::EmptyDocument),
            _ => Ok(content),
        }
    }
}

impl RegionExtractor for MockExtractor {
    fn page_size(&self, pdf_bytes: &[u8]) -> Result<PageSize, ExtractionError> {
        self.open(pdf_bytes)?;
        Ok(self.page)
    }

    fn extract(&self, pdf_bytes: &[u8], region: &Region) -> Result<String, ExtractionError> {
        let content = self.open(pdf_bytes)?;
        let lines: Vec<String> = content
            .split('|')
            .enumerate()
            .map(|(row, segment)| {
                let cy = 110.0 + 20.0 * row as f64 + 6.0;
                segment
                    .chars()
                    .enumerate()
                    .filter(|(col, _)| region.contains(110.0 + 6.0 * *col as f64 + 3.0, cy))
                    .map(|(_, c)| c)
                    .collect::<String>()
                    .trim()
                    .to_string()
            })
            .filter(|line| !line.is_empty())
            .collect();
        Ok(lines.join("\n"))
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

pub struct MockRenderer {
    pub width_px: u32,
    pub height_px: u32,
}

impl PreviewRenderer for MockRenderer {
    fn render_first_page(&self, pdf_bytes: &[u8]) -> Result<PreviewImage, ExtractionError> {
        if pdf_bytes == b"corrupt" {
            return Err(ExtractionError::MalformedDocument("not a PDF".into()));
        }
        Ok(PreviewImage::from_dimensions(self.width_px, self.height_px))
    }
}

pub fn doc(filename: &str, content: &str) -> Document {
    Document::new(filename, content.as_bytes().to_vec())
}
