use std::borrow::Cow;
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::error::ExtractionError;
use crate::extraction::{normalize_text, PageSize, RegionExtractor};
use crate::region::Region;

/// Region extraction backend using pdftotext (from poppler-utils).
///
/// Extraction hands the region to poppler as a crop window at 72 dpi, so one
/// pixel is one point and poppler decides per character what falls inside.
/// Page inspection reads the page box from `-bbox` output.
pub struct PdftotextExtractor {
    binary: PathBuf,
}

impl PdftotextExtractor {
    pub fn new() -> Self {
        Self::with_binary("pdftotext")
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        PdftotextExtractor {
            binary: binary.into(),
        }
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }

    fn run_first_page(&self, pdf_bytes: &[u8], extra: &[String]) -> Result<String, ExtractionError> {
        let tmpfile = write_temp_pdf(pdf_bytes)?;

        let mut args: Vec<&OsStr> = ["-f", "1", "-l", "1", "-enc", "UTF-8"]
            .into_iter()
            .map(OsStr::new)
            .collect();
        args.extend(extra.iter().map(OsStr::new));
        args.push(tmpfile.path().as_os_str());
        args.push(OsStr::new("-")); // output to stdout

        let output = run_tool(&self.binary, "pdftotext", &args)?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(classify_failure("pdftotext", code, stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionExtractor for PdftotextExtractor {
    fn page_size(&self, pdf_bytes: &[u8]) -> Result<PageSize, ExtractionError> {
        let xml = self.run_first_page(pdf_bytes, &["-bbox".to_string()])?;
        parse_page_size(&xml)?.ok_or(ExtractionError::EmptyDocument)
    }

    fn extract(&self, pdf_bytes: &[u8], region: &Region) -> Result<String, ExtractionError> {
        match CropWindow::from_region(region) {
            Some(window) => {
                let raw = self.run_first_page(pdf_bytes, &window.args())?;
                Ok(normalize_text(&raw))
            }
            None => {
                // Nothing to crop, but the document must still open.
                self.page_size(pdf_bytes)?;
                Ok(String::new())
            }
        }
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// Crop window in whole points, as pdftotext's `-x -y -W -H` take it at
/// `-r 72`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CropWindow {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl CropWindow {
    /// Edges are rounded to the nearest point and clamped at the page origin.
    /// `None` when nothing is left, since pdftotext reads a zero-sized window
    /// as "no crop".
    pub fn from_region(region: &Region) -> Option<Self> {
        let x = (region.x1().round() as i64).max(0);
        let y = (region.y1().round() as i64).max(0);
        let width = region.x2().round() as i64 - x;
        let height = region.y2().round() as i64 - y;
        if width <= 0 || height <= 0 {
            return None;
        }
        Some(CropWindow {
            x,
            y,
            width,
            height,
        })
    }

    pub fn args(&self) -> Vec<String> {
        vec![
            "-r".to_string(),
            "72".to_string(),
            "-x".to_string(),
            self.x.to_string(),
            "-y".to_string(),
            self.y.to_string(),
            "-W".to_string(),
            self.width.to_string(),
            "-H".to_string(),
            self.height.to_string(),
        ]
    }
}

/// Copy PDF bytes to a temp file the poppler tools can open. The file is
/// removed when the handle drops.
pub(crate) fn write_temp_pdf(pdf_bytes: &[u8]) -> Result<tempfile::NamedTempFile, ExtractionError> {
    let mut tmpfile = tempfile::Builder::new().suffix(".pdf").tempfile()?;
    tmpfile.write_all(pdf_bytes)?;
    tmpfile.flush()?;
    Ok(tmpfile)
}

pub(crate) fn run_tool(
    binary: &Path,
    tool: &str,
    args: &[&OsStr],
) -> Result<Output, ExtractionError> {
    debug!(tool, binary = %binary.display(), ?args, "running poppler tool");
    Command::new(binary).args(args).output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ExtractionError::ToolNotFound {
                tool: tool.to_string(),
            }
        } else {
            ExtractionError::Io(e)
        }
    })
}

/// Map a poppler exit status onto the extraction error taxonomy.
///
/// Poppler exits with 1 when the file cannot be opened or parsed, 3 on
/// permission (encryption) errors and 99 for everything else, including a
/// page range past the last page of a zero-page document.
pub(crate) fn classify_failure(tool: &str, code: i32, stderr: String) -> ExtractionError {
    match code {
        1 | 3 => {
            let message = if stderr.is_empty() {
                format!("{tool} could not open the document")
            } else {
                stderr
            };
            ExtractionError::MalformedDocument(message)
        }
        99 if stderr.contains("Wrong page range") => ExtractionError::EmptyDocument,
        _ => ExtractionError::ToolFailed {
            tool: tool.to_string(),
            code,
            stderr,
        },
    }
}

/// Size of the first `<page>` in `pdftotext -bbox` XHTML.
///
/// Returns `None` when the document has no `<page>` element at all.
fn parse_page_size(xml: &str) -> Result<Option<PageSize>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ExtractionError::UnexpectedOutput(format!("bbox XML: {e}")))?;

        match event {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"page" => {
                return Ok(Some(PageSize {
                    width_pt: parse_attr_f64(&e, "width")?,
                    height_pt: parse_attr_f64(&e, "height")?,
                }));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

fn parse_attr_f64(tag: &BytesStart<'_>, name: &str) -> Result<f64, ExtractionError> {
    let element = String::from_utf8_lossy(tag.name().as_ref()).into_owned();
    let attr = tag
        .try_get_attribute(name)
        .map_err(|e| ExtractionError::UnexpectedOutput(e.to_string()))?
        .ok_or_else(|| {
            ExtractionError::UnexpectedOutput(format!("<{element}> is missing {name}"))
        })?;
    let value: Cow<'_, str> = attr
        .unescape_value()
        .map_err(|e| ExtractionError::UnexpectedOutput(e.to_string()))?;
    value.trim().parse::<f64>().map_err(|e| {
        ExtractionError::UnexpectedOutput(format!("<{element}> {name}=\"{value}\": {e}"))
    })
}
