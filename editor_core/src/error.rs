//! Editor-level errors

use ipc::{FailureDescriptor, FailureKind};
use module_contract::ModuleError;
use thiserror::Error;

/// Domain errors the editor reports for a well-formed request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("Range [{from}, {to}) is not valid in a document of length {len}")]
    Range { from: i64, to: i64, len: usize },

    #[error("Unknown replace granularity '{tag}'")]
    UnknownGranularity { tag: String },
}

impl EditorError {
    pub fn kind(&self) -> FailureKind {
        match self {
            EditorError::Range { .. } => FailureKind::RangeError,
            EditorError::UnknownGranularity { .. } => FailureKind::UnknownGranularity,
        }
    }
}

impl From<EditorError> for ModuleError {
    fn from(err: EditorError) -> Self {
        ModuleError::Rejected(FailureDescriptor::new(err.kind(), err.to_string()))
    }
}
