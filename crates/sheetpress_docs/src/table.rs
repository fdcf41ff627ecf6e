//! In-memory table of text cells.

use anyhow::Result;
use sheetpress_core::ConvertError;

/// A header row plus data rows, every cell held as text.
///
/// All rows have exactly `headers.len()` cells. Missing fields are stored as
/// empty strings, never as a placeholder marker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, padding short rows with empty cells.
    ///
    /// A row with more cells than the header is rejected with
    /// [`ConvertError::RaggedRow`]; `record` in that error is 1-based and
    /// counts the header as record 1.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let width = headers.len();
        let mut normalized = Vec::with_capacity(rows.len());
        for (idx, mut row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(ConvertError::RaggedRow {
                    record: idx + 2,
                    expected: width,
                    found: row.len(),
                }
                .into());
            }
            row.resize(width, String::new());
            normalized.push(row);
        }
        Ok(Self {
            headers,
            rows: normalized,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of data rows (header excluded).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Header first, then every data row.
    pub fn all_rows(&self) -> impl Iterator<Item = &[String]> {
        std::iter::once(self.headers.as_slice()).chain(self.rows.iter().map(Vec::as_slice))
    }

    /// Longest cell per column in characters, header included.
    pub fn max_text_lengths(&self) -> Vec<usize> {
        let mut lengths = vec![0usize; self.column_count()];
        for row in self.all_rows() {
            for (len, cell) in lengths.iter_mut().zip(row) {
                *len = (*len).max(cell.chars().count());
            }
        }
        lengths
    }
}
