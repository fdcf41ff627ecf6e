//! Fixed presentation constants shared by the writers.

/// Header band fill, `#4C7E4C`.
pub const HEADER_FILL_RGB: u32 = 0x4C7E4C;
/// Header text color.
pub const HEADER_TEXT_RGB: u32 = 0xFFFFFF;
/// Body text color.
pub const BODY_TEXT_RGB: u32 = 0x000000;

// PDF table

/// Body cell fill ("whitesmoke").
pub const PDF_BODY_FILL_RGB: u32 = 0xF5F5F5;
pub const PDF_GRID_RGB: u32 = 0x000000;
pub const PDF_GRID_LINE_WIDTH: f64 = 0.5;
pub const PDF_HEADER_FONT: &str = "Helvetica-Bold";
pub const PDF_BODY_FONT: &str = "Helvetica";
pub const PDF_FONT_SIZE: f64 = 9.0;
/// Baseline-to-baseline distance for multi-line cells.
pub const PDF_LEADING: f64 = 12.0;
pub const PDF_CELL_PADDING_LEFT: f64 = 6.0;
pub const PDF_CELL_PADDING_TOP: f64 = 3.0;
pub const PDF_CELL_PADDING_BOTTOM: f64 = 3.0;
pub const PDF_HEADER_PADDING_BOTTOM: f64 = 2.0;

// PDF page

/// 11 inches.
pub const PDF_PAGE_HEIGHT: f64 = 792.0;
/// Extra page width beyond the table, 1 inch.
pub const PDF_PAGE_EXTRA_WIDTH: f64 = 72.0;
pub const PDF_PAGE_MARGIN: f64 = 10.0;
/// Inset of the content frame inside the margins.
pub const PDF_FRAME_PADDING: f64 = 6.0;

// Spreadsheet

pub const XLSX_HEADER_FONT_SIZE: f64 = 16.0;
pub const XLSX_BODY_FONT_SIZE: f64 = 14.0;
pub const XLSX_SHEET_NAME: &str = "Sheet1";

/// Split `0xRRGGBB` into PDF color components in `0.0..=1.0`.
pub fn rgb_components(rgb: u32) -> (f64, f64, f64) {
    let channel = |shift: u32| f64::from((rgb >> shift) & 0xFF) / 255.0;
    (channel(16), channel(8), channel(0))
}
