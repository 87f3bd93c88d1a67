use pdfclip_core::batch::Document;
use pdfclip_core::config::ToolConfig;
use pdfclip_core::error::PdfClipError;
use pdfclip_core::export;
use pdfclip_core::preview::PreviewImage;
use pdfclip_core::resolve::{CanvasRect, DegeneratePolicy};
use pdfclip_core::workflow::{RegionInput, Workflow};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::output;

pub struct ExtractArgs {
    pub input_files: Vec<PathBuf>,
    pub region: Option<[f64; 4]>,
    pub canvas: Option<[f64; 4]>,
    pub preview_size: Option<(u32, u32)>,
    pub reject_degenerate: bool,
    pub output_format: String,
    pub out: Option<PathBuf>,
}

pub fn run(args: ExtractArgs, tools: &ToolConfig) -> Result<(), PdfClipError> {
    let documents = args
        .input_files
        .iter()
        .map(|path| read_document(path))
        .collect::<Result<Vec<_>, _>>()?;

    let policy = if args.reject_degenerate {
        DegeneratePolicy::Reject
    } else {
        tools.degenerate_regions
    };
    let extractor = tools.extractor();
    let mut workflow = Workflow::with_policy(policy);
    workflow.upload(documents, &extractor)?;

    if let Some(size) = workflow.reference_page_size() {
        eprintln!(
            "First PDF page 1: {:.1} x {:.1} pt",
            size.width_pt, size.height_pt
        );
    }

    let input = match (args.region, args.canvas) {
        (Some([x1, y1, x2, y2]), _) => RegionInput::Direct { x1, y1, x2, y2 },
        (None, Some([left, top, width, height])) => {
            match args.preview_size {
                Some((w, h)) => workflow.attach_preview(PreviewImage::from_dimensions(w, h))?,
                None => {
                    let preview = workflow.render_preview(&tools.renderer())?;
                    eprintln!(
                        "Rendered preview: {}x{} px",
                        preview.width_px, preview.height_px
                    );
                }
            }
            RegionInput::Canvas(CanvasRect {
                left,
                top,
                width,
                height,
            })
        }
        // clap requires one of --region / --canvas
        (None, None) => {
            return Err(PdfClipError::InvalidGeometry(
                "either --region or --canvas is required".into(),
            ))
        }
    };

    let region = workflow.resolve_region(input)?;
    eprintln!("Region (pt): {region}");

    let result = workflow.run_extraction(&extractor, |p| {
        eprintln!("[{}/{}] {}", p.completed, p.total, p.filename);
    })?;

    match args.output_format.as_str() {
        "json" => output::json::print(result)?,
        "csv" => export::write_csv(result, std::io::stdout().lock())?,
        _ => output::table::print(result),
    }

    if let Some(path) = args.out {
        let file = std::fs::File::create(&path)?;
        export::write_csv(result, BufWriter::new(file))?;
        eprintln!(
            "{} record(s) written to {}",
            result.len(),
            path.display()
        );
    }

    let failed = result.failure_count();
    if failed > 0 {
        eprintln!("  {failed} document(s) could not be read");
    }

    Ok(())
}

fn read_document(path: &Path) -> Result<Document, PdfClipError> {
    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Document::new(filename, bytes))
}

/// Parse four comma-separated numbers, e.g. `100,100,300,150`.
pub fn parse_quad(s: &str) -> Result<[f64; 4], String> {
    let values = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("'{}': {e}", part.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    match values.as_slice() {
        [a, b, c, d] => Ok([*a, *b, *c, *d]),
        _ => Err(format!("expected 4 comma-separated numbers, got {}", values.len())),
    }
}

/// Parse a pixel size such as `1000x1400`.
pub fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<u32>()
            .map_err(|e| format!("'{}': {e}", v.trim()))
    };
    Ok((parse(w)?, parse(h)?))
}
