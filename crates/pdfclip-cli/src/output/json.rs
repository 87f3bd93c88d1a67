use pdfclip_core::batch::BatchResult;
use pdfclip_core::error::PdfClipError;

pub fn print(result: &BatchResult) -> Result<(), PdfClipError> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}
