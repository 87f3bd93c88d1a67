pub mod batch;
pub mod config;
pub mod error;
pub mod export;
pub mod extraction;
pub mod preview;
pub mod region;
pub mod resolve;
pub mod workflow;

use batch::{BatchResult, Document, Progress};
use error::PdfClipError;
use extraction::RegionExtractor;
use resolve::{DegeneratePolicy, RegionSpec};

pub use region::Region;
pub use workflow::Workflow;

/// Main API entry point: resolve one region and extract it from the first
/// page of every document.
///
/// Fails only if the region cannot be resolved; unreadable documents show up
/// as failed records in the result, which always has one record per document
/// in input order.
pub fn extract_batch<F>(
    documents: &[Document],
    spec: &RegionSpec,
    policy: DegeneratePolicy,
    extractor: &dyn RegionExtractor,
    on_progress: F,
) -> Result<BatchResult, PdfClipError>
where
    F: FnMut(Progress<'_>),
{
    let region = resolve::resolve(spec, policy)?;
    Ok(batch::run_batch(documents, &region, extractor, on_progress))
}
