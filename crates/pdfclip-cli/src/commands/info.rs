use pdfclip_core::config::ToolConfig;
use pdfclip_core::extraction::RegionExtractor;
use std::path::PathBuf;

pub fn run(
    input_file: PathBuf,
    tools: &ToolConfig,
) -> Result<(), pdfclip_core::error::PdfClipError> {
    let pdf_bytes = std::fs::read(&input_file)?;
    let extractor = tools.extractor();
    let size = extractor.page_size(&pdf_bytes)?;

    println!(
        "{}: page 1 is {:.1} x {:.1} pt (width x height)",
        input_file.display(),
        size.width_pt,
        size.height_pt
    );
    println!("Coordinates start at the top-left corner and grow right and down.");
    Ok(())
}
