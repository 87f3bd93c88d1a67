use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ExtractionError, FailureKind};
use crate::extraction::RegionExtractor;
use crate::region::Region;

/// An uploaded PDF. Filenames are not required to be unique.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Document {
            filename: filename.into(),
            bytes,
        }
    }
}

/// What extraction produced for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// Extracted text, possibly empty.
    Text { text: String },
    Failed { kind: FailureKind, message: String },
}

impl ExtractionOutcome {
    pub fn from_result(result: Result<String, ExtractionError>) -> Self {
        match result {
            Ok(text) => ExtractionOutcome::Text { text },
            Err(e) => ExtractionOutcome::Failed {
                kind: e.kind(),
                message: e.to_string(),
            },
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ExtractionOutcome::Failed { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            ExtractionOutcome::Text { text } => Some(text),
            ExtractionOutcome::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    pub filename: String,
    pub outcome: ExtractionOutcome,
}

/// One record per input document, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub records: Vec<ExtractionRecord>,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExtractionRecord> {
        self.records.iter()
    }

    pub fn failure_count(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_failure()).count()
    }
}

/// Reported after each document has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress<'a> {
    pub completed: usize,
    pub total: usize,
    pub filename: &'a str,
}

/// Extract `region` from every document, strictly in order.
///
/// A failing document becomes a `Failed` record; the batch itself never
/// fails and always yields exactly one record per document. Runs
/// sequentially on the calling thread: each extraction owns a temp file and
/// a child process, and nothing here is shared between documents.
pub fn run_batch<F>(
    documents: &[Document],
    region: &Region,
    extractor: &dyn RegionExtractor,
    mut on_progress: F,
) -> BatchResult
where
    F: FnMut(Progress<'_>),
{
    let total = documents.len();
    info!(
        total,
        %region,
        backend = extractor.backend_name(),
        "starting batch extraction"
    );

    let mut records = Vec::with_capacity(total);
    for (i, doc) in documents.iter().enumerate() {
        let result = extractor.extract(&doc.bytes, region);
        match &result {
            Ok(text) => debug!(file = %doc.filename, chars = text.chars().count(), "extracted"),
            Err(e) => warn!(file = %doc.filename, error = %e, "extraction failed"),
        }

        records.push(ExtractionRecord {
            filename: doc.filename.clone(),
            outcome: ExtractionOutcome::from_result(result),
        });

        on_progress(Progress {
            completed: i + 1,
            total,
            filename: &doc.filename,
        });
    }

    let result = BatchResult { records };
    info!(
        total,
        failed = result.failure_count(),
        "batch extraction finished"
    );
    result
}
