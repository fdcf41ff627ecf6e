use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Everything that can stop a conversion run.
///
/// Library code wraps these in `anyhow::Error` with added context; callers
/// recover the typed cause with `downcast_ref::<ConvertError>()`.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Input is not a .csv file: {}", .0.display())]
    NotCsv(PathBuf),

    #[error("Input has no header line")]
    EmptyInput,

    #[error("Malformed CSV at line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("Record {record} has {found} fields but the header has {expected}")]
    RaggedRow {
        record: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row} is taller than the printable page area ({height:.1}pt > {available:.1}pt)")]
    RowTooTall {
        row: usize,
        height: f64,
        available: f64,
    },

    #[error("Table exceeds spreadsheet limits: {0}")]
    SheetLimit(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Broad classification used when logging a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// The path handed to the binary cannot be used.
    Input,
    /// The input file is not valid semicolon-delimited text.
    Format,
    /// The document could not be laid out or serialized.
    Render,
    /// Filesystem or other OS-level failure.
    System,
}

impl ConvertError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound(_) | Self::NotCsv(_) => ErrorCategory::Input,
            Self::EmptyInput | Self::Parse { .. } | Self::RaggedRow { .. } => {
                ErrorCategory::Format
            }
            Self::RowTooTall { .. } | Self::SheetLimit(_) | Self::Render(_) => {
                ErrorCategory::Render
            }
            Self::Io(_) => ErrorCategory::System,
        }
    }
}

/// Classify an arbitrary `anyhow` error by the first `ConvertError` in its
/// chain. Errors without a typed cause count as system failures.
pub fn classify_error(err: &anyhow::Error) -> ErrorCategory {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ConvertError>())
        .map(ConvertError::category)
        .unwrap_or(ErrorCategory::System)
}
