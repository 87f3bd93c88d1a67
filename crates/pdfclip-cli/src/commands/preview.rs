use pdfclip_core::config::ToolConfig;
use pdfclip_core::extraction::RegionExtractor;
use pdfclip_core::preview::PreviewRenderer;
use std::path::PathBuf;

pub fn run(
    input_file: PathBuf,
    out: PathBuf,
    tools: &ToolConfig,
) -> Result<(), pdfclip_core::error::PdfClipError> {
    let pdf_bytes = std::fs::read(&input_file)?;
    let page = tools.extractor().page_size(&pdf_bytes)?;

    let renderer = tools.renderer();
    let preview = renderer.render_first_page(&pdf_bytes)?;

    if let Some(ref png) = preview.png {
        std::fs::write(&out, png)?;
    }

    eprintln!(
        "Preview written to {} ({}x{} px at {} dpi)",
        out.display(),
        preview.width_px,
        preview.height_px,
        renderer.dpi()
    );
    if preview.width_px > 0 && preview.height_px > 0 {
        eprintln!(
            "  1 px = {:.4} pt horizontally, {:.4} pt vertically",
            page.width_pt / f64::from(preview.width_px),
            page.height_pt / f64::from(preview.height_px)
        );
    }
    Ok(())
}
