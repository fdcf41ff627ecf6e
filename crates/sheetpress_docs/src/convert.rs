//! End-to-end conversion pipelines: read, size, render, write.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::csv::read_table;
use crate::paths::{OutputKind, derive_output_path};
use crate::pdf::generate_pdf_table;
use crate::sizing::pdf_column_widths;
use crate::xlsx::generate_xlsx_table;

/// Summary of one finished conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub output: PathBuf,
    /// Data rows, header excluded.
    pub rows: usize,
    pub columns: usize,
    /// Page count; only set for PDF output.
    pub pages: Option<usize>,
}

/// Dispatch on `kind`.
pub fn convert(input: &Path, kind: OutputKind) -> Result<Conversion> {
    match kind {
        OutputKind::Pdf => convert_csv_to_pdf(input),
        OutputKind::Xlsx => convert_csv_to_xlsx(input),
    }
}

/// Convert `input` (`*.csv`) to a PDF table next to it.
pub fn convert_csv_to_pdf(input: &Path) -> Result<Conversion> {
    let output = derive_output_path(input, OutputKind::Pdf)?;
    let table = read_table(input)?;

    let widths = pdf_column_widths(&table);
    let title = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let pdf = generate_pdf_table(&title, &table, &widths)
        .with_context(|| format!("Failed to render {}", output.display()))?;

    std::fs::write(&output, &pdf.bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(
        pages = pdf.pages,
        bytes = pdf.bytes.len(),
        "Wrote {}",
        output.display()
    );

    Ok(Conversion {
        output,
        rows: table.row_count(),
        columns: table.column_count(),
        pages: Some(pdf.pages),
    })
}

/// Convert `input` (`*.csv`) to a styled workbook next to it.
pub fn convert_csv_to_xlsx(input: &Path) -> Result<Conversion> {
    let output = derive_output_path(input, OutputKind::Xlsx)?;
    let table = read_table(input)?;

    let bytes = generate_xlsx_table(&table)
        .with_context(|| format!("Failed to build {}", output.display()))?;

    std::fs::write(&output, &bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(bytes = bytes.len(), "Wrote {}", output.display());

    Ok(Conversion {
        output,
        rows: table.row_count(),
        columns: table.column_count(),
        pages: None,
    })
}
