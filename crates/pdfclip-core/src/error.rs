use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::workflow::{Prerequisite, WorkflowState};

/// Failure while reading one document. Captured per record by the batch runner.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("document has no pages")]
    EmptyDocument,

    #[error("malformed PDF: {0}")]
    MalformedDocument(String),

    #[error("{tool} not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    ToolNotFound { tool: String },

    #[error("{tool} failed with exit code {code}: {stderr}")]
    ToolFailed {
        tool: String,
        code: i32,
        stderr: String,
    },

    #[error("unexpected extractor output: {0}")]
    UnexpectedOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of an [`ExtractionError`], kept on each failed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    EmptyDocument,
    MalformedDocument,
    Unexpected,
}

impl ExtractionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ExtractionError::EmptyDocument => FailureKind::EmptyDocument,
            ExtractionError::MalformedDocument(_) => FailureKind::MalformedDocument,
            _ => FailureKind::Unexpected,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PdfClipError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("cannot proceed from {state}: {missing} is missing")]
    MissingPrerequisite {
        state: WorkflowState,
        missing: Prerequisite,
    },

    #[error("cannot {action} while {state}; start a new batch first")]
    StageClosed {
        state: WorkflowState,
        action: &'static str,
    },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
