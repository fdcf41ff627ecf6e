use std::path::{Path, PathBuf};

use anyhow::Result;
use sheetpress_core::ConvertError;

const CSV_SUFFIX: &str = ".csv";

/// Document kind produced by a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Pdf,
    Xlsx,
}

impl OutputKind {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
        }
    }

    /// Human-readable name used in the confirmation line.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Xlsx => "Excel",
        }
    }
}

/// Replace the trailing `.csv` of `input`'s file name with `kind`'s extension.
///
/// The suffix match ignores ASCII case. Only the final suffix is replaced;
/// directories and inner occurrences of `.csv` are untouched. Paths without
/// the suffix are rejected so the output can never land on the input.
pub fn derive_output_path(input: &Path, kind: OutputKind) -> Result<PathBuf> {
    let Some(file_name) = input.file_name().and_then(|name| name.to_str()) else {
        return Err(ConvertError::NotCsv(input.to_path_buf()).into());
    };

    let split = file_name.len().checked_sub(CSV_SUFFIX.len());
    let stem = match split {
        Some(idx)
            if file_name.is_char_boundary(idx)
                && file_name[idx..].eq_ignore_ascii_case(CSV_SUFFIX) =>
        {
            &file_name[..idx]
        }
        _ => return Err(ConvertError::NotCsv(input.to_path_buf()).into()),
    };

    Ok(input.with_file_name(format!("{stem}.{}", kind.extension())))
}
