//! Column-width heuristics.
//!
//! The PDF and spreadsheet paths size columns with different formulas and are
//! deliberately kept apart.

use crate::table::Table;

/// PDF user-space units per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Narrowest PDF column, in points.
pub const PDF_MIN_COLUMN_WIDTH: f64 = 0.01 * POINTS_PER_INCH;

/// PDF width granted per character of the longest cell, in points.
pub const PDF_WIDTH_PER_CHAR: f64 = 0.07 * POINTS_PER_INCH;

/// Fixed PDF padding added to every column, in points.
pub const PDF_COLUMN_PADDING: f64 = 0.5 * POINTS_PER_INCH;

/// Extra spreadsheet character units added to the longest cell.
pub const XLSX_WIDTH_MARGIN: usize = 10;

/// PDF width for a column whose longest cell has `max_chars` characters.
pub fn pdf_column_width(max_chars: usize) -> f64 {
    (max_chars as f64 * PDF_WIDTH_PER_CHAR + PDF_COLUMN_PADDING).max(PDF_MIN_COLUMN_WIDTH)
}

/// One PDF width (points) per column, header text included.
pub fn pdf_column_widths(table: &Table) -> Vec<f64> {
    table
        .max_text_lengths()
        .into_iter()
        .map(pdf_column_width)
        .collect()
}

/// Spreadsheet width for a column whose longest cell has `max_chars` characters.
pub fn xlsx_column_width(max_chars: usize) -> f64 {
    (max_chars + XLSX_WIDTH_MARGIN) as f64
}

/// One spreadsheet width (character units) per column, header text included.
pub fn xlsx_column_widths(table: &Table) -> Vec<f64> {
    table
        .max_text_lengths()
        .into_iter()
        .map(xlsx_column_width)
        .collect()
}
