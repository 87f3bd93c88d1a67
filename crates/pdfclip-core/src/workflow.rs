//! The upload → region → extract → results pipeline.
//!
//! A [`Workflow`] owns everything one session produces. States only move
//! forward; the single way back is [`Workflow::reset`], which drops the
//! documents, preview, region and results together. A rejected transition
//! returns an error and leaves the workflow exactly as it was.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

use crate::batch::{run_batch, BatchResult, Document, Progress};
use crate::error::PdfClipError;
use crate::extraction::{PageSize, RegionExtractor};
use crate::preview::{PreviewImage, PreviewRenderer};
use crate::region::Region;
use crate::resolve::{resolve_canvas, resolve_direct, CanvasRect, DegeneratePolicy};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    #[default]
    AwaitingUpload,
    AwaitingRegion,
    ExtractionPending,
    ExtractionDone,
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowState::AwaitingUpload => write!(f, "awaiting upload"),
            WorkflowState::AwaitingRegion => write!(f, "awaiting region"),
            WorkflowState::ExtractionPending => write!(f, "extraction pending"),
            WorkflowState::ExtractionDone => write!(f, "extraction done"),
        }
    }
}

/// Output of an earlier stage that a transition depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prerequisite {
    Documents,
    PageSize,
    Preview,
    Region,
    CompleteResult,
}

impl fmt::Display for Prerequisite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prerequisite::Documents => write!(f, "at least one uploaded document"),
            Prerequisite::PageSize => write!(f, "the first document's page size"),
            Prerequisite::Preview => write!(f, "a preview image"),
            Prerequisite::Region => write!(f, "a resolved region"),
            Prerequisite::CompleteResult => write!(f, "a result for every document"),
        }
    }
}

/// Region input accepted by [`Workflow::resolve_region`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegionInput {
    Direct { x1: f64, y1: f64, x2: f64, y2: f64 },
    /// A rectangle drawn on the workflow's preview image.
    Canvas(CanvasRect),
}

#[derive(Debug, Default)]
pub struct Workflow {
    state: WorkflowState,
    policy: DegeneratePolicy,
    documents: Vec<Document>,
    page_size: Option<PageSize>,
    preview: Option<PreviewImage>,
    region: Option<Region>,
    result: Option<BatchResult>,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DegeneratePolicy) -> Self {
        Workflow {
            policy,
            ..Self::default()
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Page 1 size of the first document, if it could be read at upload.
    pub fn reference_page_size(&self) -> Option<PageSize> {
        self.page_size
    }

    pub fn preview(&self) -> Option<&PreviewImage> {
        self.preview.as_ref()
    }

    pub fn region(&self) -> Option<Region> {
        self.region
    }

    pub fn result(&self) -> Option<&BatchResult> {
        self.result.as_ref()
    }

    /// Whether `state` has been reached, i.e. can be reviewed without
    /// changing anything.
    pub fn is_reachable(&self, state: WorkflowState) -> bool {
        state <= self.state
    }

    /// `AwaitingUpload → AwaitingRegion`. Also inspects the first document's
    /// page size; if that fails the upload still succeeds and canvas mode
    /// stays unavailable.
    pub fn upload(
        &mut self,
        documents: Vec<Document>,
        extractor: &dyn RegionExtractor,
    ) -> Result<(), PdfClipError> {
        if self.state != WorkflowState::AwaitingUpload {
            return Err(self.closed("upload documents"));
        }
        let Some(first) = documents.first() else {
            return Err(self.missing(Prerequisite::Documents));
        };

        self.page_size = match extractor.page_size(&first.bytes) {
            Ok(size) => {
                info!(
                    file = %first.filename,
                    width_pt = size.width_pt,
                    height_pt = size.height_pt,
                    "first page size"
                );
                Some(size)
            }
            Err(e) => {
                warn!(file = %first.filename, error = %e, "could not read first page size");
                None
            }
        };
        info!(count = documents.len(), "documents uploaded");
        self.documents = documents;
        self.state = WorkflowState::AwaitingRegion;
        Ok(())
    }

    pub fn attach_preview(&mut self, preview: PreviewImage) -> Result<(), PdfClipError> {
        self.require_region_stage("attach a preview")?;
        self.preview = Some(preview);
        Ok(())
    }

    /// Render the first document's page 1 and keep it as the preview.
    pub fn render_preview(
        &mut self,
        renderer: &dyn PreviewRenderer,
    ) -> Result<&PreviewImage, PdfClipError> {
        self.require_region_stage("render a preview")?;
        let first = self
            .documents
            .first()
            .ok_or_else(|| self.missing(Prerequisite::Documents))?;
        let preview = renderer.render_first_page(&first.bytes)?;
        Ok(self.preview.insert(preview))
    }

    /// Resolve `input` into a region and advance to `ExtractionPending`.
    /// Resolving again before extraction replaces the region.
    pub fn resolve_region(&mut self, input: RegionInput) -> Result<Region, PdfClipError> {
        self.require_region_stage("change the region")?;

        let region = match input {
            RegionInput::Direct { x1, y1, x2, y2 } => resolve_direct(x1, y1, x2, y2, self.policy)?,
            RegionInput::Canvas(rect) => {
                let preview = self
                    .preview
                    .as_ref()
                    .ok_or_else(|| self.missing(Prerequisite::Preview))?;
                let page = self
                    .page_size
                    .as_ref()
                    .ok_or_else(|| self.missing(Prerequisite::PageSize))?;
                resolve_canvas(&rect, preview, page)?
            }
        };

        self.accept_region(region);
        Ok(region)
    }

    /// `AwaitingRegion → ExtractionPending` with a region in points, e.g.
    /// one loaded from a saved batch. It goes through direct resolution, so
    /// the degenerate policy and the finiteness checks apply.
    pub fn set_region(&mut self, region: Region) -> Result<(), PdfClipError> {
        self.require_region_stage("change the region")?;
        let (x1, y1, x2, y2) = region.as_tuple();
        let region = resolve_direct(x1, y1, x2, y2, self.policy)?;
        self.accept_region(region);
        Ok(())
    }

    fn accept_region(&mut self, region: Region) {
        info!(%region, "region set");
        self.region = Some(region);
        self.state = WorkflowState::ExtractionPending;
    }

    /// `ExtractionPending → ExtractionDone`. Blocks until every document has
    /// been processed.
    pub fn run_extraction<F>(
        &mut self,
        extractor: &dyn RegionExtractor,
        on_progress: F,
    ) -> Result<&BatchResult, PdfClipError>
    where
        F: FnMut(Progress<'_>),
    {
        match self.state {
            WorkflowState::AwaitingUpload => return Err(self.missing(Prerequisite::Documents)),
            WorkflowState::AwaitingRegion => return Err(self.missing(Prerequisite::Region)),
            WorkflowState::ExtractionDone => return Err(self.closed("run the extraction again")),
            WorkflowState::ExtractionPending => {}
        }
        let region = self.region.ok_or_else(|| self.missing(Prerequisite::Region))?;

        let result = run_batch(&self.documents, &region, extractor, on_progress);
        if result.len() != self.documents.len() {
            return Err(self.missing(Prerequisite::CompleteResult));
        }

        self.state = WorkflowState::ExtractionDone;
        Ok(self.result.insert(result))
    }

    /// Any state → `AwaitingUpload`, discarding everything at once.
    pub fn reset(&mut self) {
        *self = Workflow::with_policy(self.policy);
    }

    fn require_region_stage(&self, action: &'static str) -> Result<(), PdfClipError> {
        match self.state {
            WorkflowState::AwaitingUpload => Err(self.missing(Prerequisite::Documents)),
            WorkflowState::ExtractionDone => Err(self.closed(action)),
            WorkflowState::AwaitingRegion | WorkflowState::ExtractionPending => Ok(()),
        }
    }

    fn missing(&self, missing: Prerequisite) -> PdfClipError {
        PdfClipError::MissingPrerequisite {
            state: self.state,
            missing,
        }
    }

    fn closed(&self, action: &'static str) -> PdfClipError {
        PdfClipError::StageClosed {
            state: self.state,
            action,
        }
    }
}
