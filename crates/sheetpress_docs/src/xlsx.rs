use anyhow::Result;
use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet, XlsxError,
};
use sheetpress_core::ConvertError;
use tracing::debug;

use crate::sizing::xlsx_column_widths;
use crate::style::{
    HEADER_FILL_RGB, HEADER_TEXT_RGB, XLSX_BODY_FONT_SIZE, XLSX_HEADER_FONT_SIZE, XLSX_SHEET_NAME,
};
use crate::table::Table;

/// Worksheet row limit, header included.
pub const XLSX_MAX_ROWS: usize = 1_048_576;
/// Worksheet column limit.
pub const XLSX_MAX_COLUMNS: usize = 16_384;

/// Bold white 16pt text on solid green, thin border, left / vertically centred.
pub fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_size(XLSX_HEADER_FONT_SIZE)
        .set_font_color(Color::RGB(HEADER_TEXT_RGB))
        .set_background_color(Color::RGB(HEADER_FILL_RGB))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter)
}

/// 14pt text, left / vertically centred.
pub fn body_format() -> Format {
    Format::new()
        .set_font_size(XLSX_BODY_FONT_SIZE)
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter)
}

/// Generate a styled single-sheet XLSX workbook from `table`.
///
/// Every cell, header included, is written as text; empty cells are written
/// as formatted blanks so the row styling still covers them.
pub fn generate_xlsx_table(table: &Table) -> Result<Vec<u8>> {
    check_limits(table)?;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(XLSX_SHEET_NAME).map_err(render_error)?;

    let header_format = header_format();
    let body_format = body_format();

    write_row(worksheet, 0, table.headers(), &header_format)?;
    for (idx, row) in table.rows().iter().enumerate() {
        write_row(worksheet, idx + 1, row, &body_format)?;
    }

    for (col, width) in xlsx_column_widths(table).into_iter().enumerate() {
        worksheet
            .set_column_width(cast_col_num(col)?, width)
            .map_err(render_error)?;
    }

    let bytes = workbook.save_to_buffer().map_err(render_error)?;
    debug!(
        rows = table.row_count(),
        columns = table.column_count(),
        bytes = bytes.len(),
        "Built workbook"
    );
    Ok(bytes)
}

fn write_row(
    worksheet: &mut Worksheet,
    row_idx: usize,
    values: &[String],
    format: &Format,
) -> Result<()> {
    let row = cast_row_num(row_idx)?;
    for (col_idx, value) in values.iter().enumerate() {
        let col = cast_col_num(col_idx)?;
        if value.is_empty() {
            worksheet
                .write_blank(row, col, format)
                .map_err(render_error)?;
        } else {
            worksheet
                .write_string_with_format(row, col, value, format)
                .map_err(render_error)?;
        }
    }
    Ok(())
}

fn check_limits(table: &Table) -> Result<()> {
    if table.column_count() > XLSX_MAX_COLUMNS {
        return Err(ConvertError::SheetLimit(format!(
            "{} columns, max {XLSX_MAX_COLUMNS}",
            table.column_count()
        ))
        .into());
    }
    if table.row_count() + 1 > XLSX_MAX_ROWS {
        return Err(ConvertError::SheetLimit(format!(
            "{} rows including header, max {XLSX_MAX_ROWS}",
            table.row_count() + 1
        ))
        .into());
    }
    Ok(())
}

fn cast_row_num(value: usize) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| ConvertError::SheetLimit(format!("row index overflow: {value}")).into())
}

fn cast_col_num(value: usize) -> Result<u16> {
    u16::try_from(value)
        .map_err(|_| ConvertError::SheetLimit(format!("column index overflow: {value}")).into())
}

fn render_error(err: XlsxError) -> anyhow::Error {
    ConvertError::Render(format!("xlsx write error: {err}")).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::parse_table;

    #[test]
    fn test_generate_xlsx_basic() {
        let table = parse_table("Nama;Umur\nAna;30\nBudi;25\n").unwrap();
        let bytes = generate_xlsx_table(&table).unwrap();
        // XLSX files are zip archives
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn test_generate_xlsx_header_only() {
        let table = parse_table("Col1;Col2\n").unwrap();
        let bytes = generate_xlsx_table(&table).unwrap();
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn test_generate_xlsx_special_characters() {
        let table = Table::new(
            vec!["Data".into()],
            vec![
                vec!["Hello, \"World\"".into()],
                vec!["Line1\nLine2".into()],
                vec!["<tag> & ;".into()],
            ],
        )
        .unwrap();
        assert!(!generate_xlsx_table(&table).unwrap().is_empty());
    }

    #[test]
    fn too_many_columns_is_a_sheet_limit_error() {
        let headers: Vec<String> = (0..XLSX_MAX_COLUMNS + 1).map(|i| i.to_string()).collect();
        let table = Table::new(headers, vec![]).unwrap();
        let err = generate_xlsx_table(&table).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::SheetLimit(_))
        ));
    }

    #[test]
    fn casts_reject_out_of_range_indices() {
        assert!(cast_col_num(70_000).is_err());
        assert_eq!(cast_col_num(3).unwrap(), 3);
        assert_eq!(cast_row_num(1_048_575).unwrap(), 1_048_575);
    }
}
