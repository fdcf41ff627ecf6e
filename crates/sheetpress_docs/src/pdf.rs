//! PDF table rendering.
//!
//! Writes PDF 1.4 directly. Only the standard Helvetica and Helvetica-Bold
//! faces are referenced, so no font files are embedded. The page is as wide
//! as the table plus a fixed allowance; rows that overflow the frame continue
//! on further pages, each starting with the header row.

use std::ops::Range;

use anyhow::Result;
use sheetpress_core::ConvertError;
use tracing::debug;

use crate::style::{
    BODY_TEXT_RGB, HEADER_FILL_RGB, HEADER_TEXT_RGB, PDF_BODY_FILL_RGB, PDF_BODY_FONT,
    PDF_CELL_PADDING_BOTTOM, PDF_CELL_PADDING_LEFT, PDF_CELL_PADDING_TOP, PDF_FONT_SIZE,
    PDF_FRAME_PADDING, PDF_GRID_LINE_WIDTH, PDF_GRID_RGB, PDF_HEADER_FONT,
    PDF_HEADER_PADDING_BOTTOM, PDF_LEADING, PDF_PAGE_EXTRA_WIDTH, PDF_PAGE_HEIGHT,
    PDF_PAGE_MARGIN, rgb_components,
};
use crate::table::Table;

/// Slack when comparing accumulated row heights against the frame.
const LAYOUT_EPSILON: f64 = 1e-6;

/// Page size derived from the column widths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
}

impl PageGeometry {
    pub fn for_columns(widths: &[f64]) -> Self {
        Self {
            width: widths.iter().sum::<f64>() + PDF_PAGE_EXTRA_WIDTH,
            height: PDF_PAGE_HEIGHT,
        }
    }

    /// Top edge of the content frame.
    pub fn frame_top(&self) -> f64 {
        self.height - PDF_PAGE_MARGIN - PDF_FRAME_PADDING
    }

    /// Vertical space available to the table on one page.
    pub fn frame_height(&self) -> f64 {
        self.frame_top() - (PDF_PAGE_MARGIN + PDF_FRAME_PADDING)
    }

    /// Left edge of a table of `table_width`, centred horizontally.
    pub fn table_left(&self, table_width: f64) -> f64 {
        (self.width - table_width) / 2.0
    }
}

/// A finished PDF document.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

/// Render `table` as a styled PDF table with the given column widths (points).
///
/// `title` goes into the document info dictionary.
pub fn generate_pdf_table(title: &str, table: &Table, widths: &[f64]) -> Result<RenderedPdf> {
    if widths.len() != table.column_count() {
        return Err(ConvertError::Render(format!(
            "{} column widths for {} columns",
            widths.len(),
            table.column_count()
        ))
        .into());
    }

    let geometry = PageGeometry::for_columns(widths);
    let header_height = row_height(table.headers(), PDF_HEADER_PADDING_BOTTOM);
    let body_heights: Vec<f64> = table
        .rows()
        .iter()
        .map(|row| row_height(row, PDF_CELL_PADDING_BOTTOM))
        .collect();

    let pages = paginate(header_height, &body_heights, geometry.frame_height())?;
    debug!(
        pages = pages.len(),
        width = geometry.width,
        "Laid out {} rows",
        table.row_count()
    );

    let painter = TablePainter {
        table,
        widths,
        geometry,
        header_height,
        body_heights: &body_heights,
    };
    let mut builder = PdfBuilder::new(geometry);
    for range in &pages {
        builder.add_page(painter.paint(range.clone()));
    }

    Ok(RenderedPdf {
        pages: pages.len(),
        bytes: builder.build(title),
    })
}

/// Split body rows into pages. Every page repeats the header, so each range
/// holds the rows that fit below it. Always yields at least one page.
pub fn paginate(
    header_height: f64,
    body_heights: &[f64],
    available: f64,
) -> Result<Vec<Range<usize>>> {
    if header_height > available + LAYOUT_EPSILON {
        return Err(ConvertError::RowTooTall {
            row: 0,
            height: header_height,
            available,
        }
        .into());
    }

    let mut pages = Vec::new();
    let mut start = 0;
    let mut used = header_height;
    for (idx, &height) in body_heights.iter().enumerate() {
        if header_height + height > available + LAYOUT_EPSILON {
            return Err(ConvertError::RowTooTall {
                row: idx + 1,
                height,
                available: available - header_height,
            }
            .into());
        }
        if used + height > available + LAYOUT_EPSILON {
            pages.push(start..idx);
            start = idx;
            used = header_height;
        }
        used += height;
    }
    pages.push(start..body_heights.len());
    Ok(pages)
}

/// Height of one table row: tallest cell by line count, plus padding.
pub fn row_height(row: &[String], bottom_padding: f64) -> f64 {
    let lines = row
        .iter()
        .map(|cell| cell_lines(cell).count())
        .max()
        .unwrap_or(1);
    lines as f64 * PDF_LEADING + PDF_CELL_PADDING_TOP + bottom_padding
}

fn cell_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

struct TablePainter<'a> {
    table: &'a Table,
    widths: &'a [f64],
    geometry: PageGeometry,
    header_height: f64,
    body_heights: &'a [f64],
}

impl TablePainter<'_> {
    /// Content stream for one page holding the header and `rows`.
    fn paint(&self, rows: Range<usize>) -> String {
        let table_width: f64 = self.widths.iter().sum();
        let left = self.geometry.table_left(table_width);
        let top = self.geometry.frame_top();
        let body_height: f64 = self.body_heights[rows.clone()].iter().sum();
        let bottom = top - self.header_height - body_height;

        let mut content = String::new();

        // Backgrounds
        push_fill_color(&mut content, HEADER_FILL_RGB);
        content.push_str(&format!(
            "{left:.2} {:.2} {table_width:.2} {:.2} re f\n",
            top - self.header_height,
            self.header_height
        ));
        if body_height > 0.0 {
            push_fill_color(&mut content, PDF_BODY_FILL_RGB);
            content.push_str(&format!(
                "{left:.2} {bottom:.2} {table_width:.2} {body_height:.2} re f\n"
            ));
        }

        // Grid
        let (r, g, b) = rgb_components(PDF_GRID_RGB);
        content.push_str(&format!("{r:.3} {g:.3} {b:.3} RG\n"));
        content.push_str(&format!("{PDF_GRID_LINE_WIDTH:.2} w\n"));
        let right = left + table_width;
        let mut y = top;
        push_line(&mut content, left, y, right, y);
        y -= self.header_height;
        push_line(&mut content, left, y, right, y);
        for &height in &self.body_heights[rows.clone()] {
            y -= height;
            push_line(&mut content, left, y, right, y);
        }
        let mut x = left;
        push_line(&mut content, x, top, x, bottom);
        for width in self.widths {
            x += width;
            push_line(&mut content, x, top, x, bottom);
        }

        // Text
        push_fill_color(&mut content, HEADER_TEXT_RGB);
        self.paint_row(&mut content, self.table.headers(), "F1", top, left);
        push_fill_color(&mut content, BODY_TEXT_RGB);
        let mut row_top = top - self.header_height;
        for idx in rows {
            self.paint_row(&mut content, &self.table.rows()[idx], "F2", row_top, left);
            row_top -= self.body_heights[idx];
        }

        content
    }

    fn paint_row(&self, content: &mut String, row: &[String], font: &str, row_top: f64, left: f64) {
        let mut cell_left = left;
        for (cell, width) in row.iter().zip(self.widths) {
            let x = cell_left + PDF_CELL_PADDING_LEFT;
            let mut baseline = row_top - PDF_CELL_PADDING_TOP - PDF_FONT_SIZE;
            for line in cell_lines(cell) {
                if !line.is_empty() {
                    content.push_str("BT\n");
                    content.push_str(&format!("/{font} {PDF_FONT_SIZE:.0} Tf\n"));
                    content.push_str(&format!("{x:.2} {baseline:.2} Td\n"));
                    content.push_str(&format!("({}) Tj\n", pdf_escape(line)));
                    content.push_str("ET\n");
                }
                baseline -= PDF_LEADING;
            }
            cell_left += width;
        }
    }
}

fn push_fill_color(content: &mut String, rgb: u32) {
    let (r, g, b) = rgb_components(rgb);
    content.push_str(&format!("{r:.3} {g:.3} {b:.3} rg\n"));
}

fn push_line(content: &mut String, x1: f64, y1: f64, x2: f64, y2: f64) {
    content.push_str(&format!("{x1:.2} {y1:.2} m {x2:.2} {y2:.2} l S\n"));
}

/// Escape text for a PDF literal string in `WinAnsiEncoding`.
///
/// The result is pure ASCII: bytes outside the printable range are written as
/// octal escapes and characters with no WinAnsi code become `?`.
fn pdf_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match win_ansi_byte(ch) {
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            b'\\' => out.push_str("\\\\"),
            byte @ 0x20..=0x7E => out.push(char::from(byte)),
            byte => out.push_str(&format!("\\{byte:03o}")),
        }
    }
    out
}

fn win_ansi_byte(ch: char) -> u8 {
    let code = u32::from(ch);
    if code < 0x80 || (0xA0..=0xFF).contains(&code) {
        return code as u8;
    }
    match ch {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => b'?',
    }
}

/// Minimal PDF file builder. Object layout:
/// 1 catalog, 2 page tree, 3-4 fonts, 5 info, then a page/content pair per page.
struct PdfBuilder {
    geometry: PageGeometry,
    pages: Vec<String>,
}

impl PdfBuilder {
    fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
        }
    }

    fn add_page(&mut self, content: String) {
        self.pages.push(content);
    }

    fn page_object_id(index: usize) -> usize {
        6 + index * 2
    }

    /// Build the complete PDF file as bytes.
    fn build(&self, title: &str) -> Vec<u8> {
        let mut pdf = String::new();
        let mut offsets: Vec<usize> = Vec::new();

        pdf.push_str("%PDF-1.4\n");

        offsets.push(pdf.len());
        pdf.push_str("1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

        offsets.push(pdf.len());
        let kids: Vec<String> = (0..self.pages.len())
            .map(|idx| format!("{} 0 R", Self::page_object_id(idx)))
            .collect();
        pdf.push_str(&format!(
            "2 0 obj\n<< /Type /Pages /Kids [{}] /Count {} >>\nendobj\n",
            kids.join(" "),
            self.pages.len()
        ));

        offsets.push(pdf.len());
        pdf.push_str(&format!(
            "3 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /{PDF_HEADER_FONT} /Encoding /WinAnsiEncoding >>\nendobj\n"
        ));

        offsets.push(pdf.len());
        pdf.push_str(&format!(
            "4 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /{PDF_BODY_FONT} /Encoding /WinAnsiEncoding >>\nendobj\n"
        ));

        offsets.push(pdf.len());
        pdf.push_str(&format!(
            "5 0 obj\n<< /Title ({}) /Producer (sheetpress) >>\nendobj\n",
            pdf_escape(title)
        ));

        for (idx, content) in self.pages.iter().enumerate() {
            let page_id = Self::page_object_id(idx);
            let content_id = page_id + 1;

            offsets.push(pdf.len());
            pdf.push_str(&format!("{page_id} 0 obj\n<< /Type /Page /Parent 2 0 R "));
            pdf.push_str(&format!(
                "/MediaBox [0 0 {:.2} {:.2}] ",
                self.geometry.width, self.geometry.height
            ));
            pdf.push_str(&format!(
                "/Contents {content_id} 0 R /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> >>\nendobj\n"
            ));

            offsets.push(pdf.len());
            pdf.push_str(&format!(
                "{content_id} 0 obj\n<< /Length {} >>\nstream\n{}\nendstream\nendobj\n",
                content.len(),
                content
            ));
        }

        // Cross-reference table
        let xref_offset = pdf.len();
        let num_objects = offsets.len() + 1;
        pdf.push_str(&format!("xref\n0 {num_objects}\n"));
        pdf.push_str("0000000000 65535 f \n");
        for offset in &offsets {
            pdf.push_str(&format!("{offset:010} 00000 n \n"));
        }

        pdf.push_str(&format!(
            "trailer\n<< /Size {num_objects} /Root 1 0 R /Info 5 0 R >>\n"
        ));
        pdf.push_str(&format!("startxref\n{xref_offset}\n%%EOF\n"));

        pdf.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::parse_table;
    use crate::sizing::pdf_column_widths;

    fn render(input: &str) -> RenderedPdf {
        let table = parse_table(input).unwrap();
        let widths = pdf_column_widths(&table);
        generate_pdf_table("test", &table, &widths).unwrap()
    }

    fn text(pdf: &RenderedPdf) -> String {
        String::from_utf8(pdf.bytes.clone()).unwrap()
    }

    #[test]
    fn test_pdf_escape() {
        assert_eq!(pdf_escape("hello"), "hello");
        assert_eq!(pdf_escape("(test)"), "\\(test\\)");
        assert_eq!(pdf_escape("a\\b"), "a\\\\b");
    }

    #[test]
    fn escape_maps_to_win_ansi() {
        assert_eq!(pdf_escape("café"), "caf\\351");
        assert_eq!(pdf_escape("€5"), "\\2005");
        assert_eq!(pdf_escape("“x”"), "\\223x\\224");
        assert_eq!(pdf_escape("中"), "?");
        assert_eq!(pdf_escape("a\tb"), "a\\011b");
    }

    #[test]
    fn row_height_counts_lines() {
        let single = vec!["a".to_string(), String::new()];
        assert_eq!(row_height(&single, PDF_CELL_PADDING_BOTTOM), 18.0);
        assert_eq!(row_height(&single, PDF_HEADER_PADDING_BOTTOM), 17.0);

        let multi = vec!["a\nb\r\nc".to_string()];
        assert_eq!(row_height(&multi, PDF_CELL_PADDING_BOTTOM), 42.0);
    }

    #[test]
    fn paginate_without_rows_is_one_page() {
        let pages = paginate(17.0, &[], 760.0).unwrap();
        assert_eq!(pages, vec![0..0]);
    }

    #[test]
    fn paginate_splits_when_frame_is_full() {
        let heights = vec![18.0; 5];
        // 17 + 2 * 18 = 53 fits in 60, a third row does not.
        let pages = paginate(17.0, &heights, 60.0).unwrap();
        assert_eq!(pages, vec![0..2, 2..4, 4..5]);
    }

    #[test]
    fn paginate_rejects_row_taller_than_frame() {
        let err = paginate(17.0, &[18.0, 100.0], 60.0).unwrap_err();
        match err.downcast_ref::<ConvertError>() {
            Some(ConvertError::RowTooTall { row, .. }) => assert_eq!(*row, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn page_width_is_columns_plus_one_inch() {
        let geometry = PageGeometry::for_columns(&[41.04, 46.08, 51.12]);
        assert!((geometry.width - 210.24).abs() < 1e-9);
        assert_eq!(geometry.height, 792.0);
        assert_eq!(geometry.frame_top(), 776.0);
        assert_eq!(geometry.frame_height(), 760.0);
        assert!((geometry.table_left(138.24) - 36.0).abs() < 1e-9);
    }

    #[test]
    fn document_structure() {
        let pdf = render("a;bb;ccc\n1;22;333\n");
        let text = text(&pdf);
        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.ends_with("%%EOF\n"));
        assert_eq!(pdf.pages, 1);
        assert!(text.contains("/Count 1"));
        assert!(text.contains("/MediaBox [0 0 210.24 792.00]"));
        assert!(text.contains("/BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding"));
        assert!(text.contains("/BaseFont /Helvetica /Encoding /WinAnsiEncoding"));
    }

    #[test]
    fn xref_points_at_objects() {
        let pdf = render("a;b\n1;2\n");
        let text = text(&pdf);
        let startxref = text.rfind("startxref\n").unwrap() + "startxref\n".len();
        let offset: usize = text[startxref..].lines().next().unwrap().parse().unwrap();
        assert!(text[offset..].starts_with("xref\n"));

        let entries: Vec<usize> = text[offset..]
            .lines()
            .skip(3)
            .take_while(|line| line.ends_with(" n "))
            .map(|line| line[..10].parse().unwrap())
            .collect();
        assert_eq!(entries.len(), 7);
        for (idx, entry) in entries.iter().enumerate() {
            assert!(text[*entry..].starts_with(&format!("{} 0 obj", idx + 1)));
        }
    }

    #[test]
    fn header_uses_fixed_colors_and_bold_font() {
        let text = text(&render("Nama;Nilai\nAna;90\n"));
        assert!(text.contains("0.298 0.494 0.298 rg\n"));
        assert!(text.contains("0.961 0.961 0.961 rg\n"));
        assert!(text.contains("1.000 1.000 1.000 rg\n"));
        assert!(text.contains("0.50 w\n"));
        assert!(text.contains("/F1 9 Tf\n42.00 764.00 Td\n(Nama) Tj"));
        assert!(text.contains("(Ana) Tj"));
        assert!(text.contains("/F2 9 Tf"));
    }

    #[test]
    fn header_repeats_on_every_page() {
        let mut input = String::from("Nama;Nilai\n");
        for idx in 0..100 {
            input.push_str(&format!("siswa{idx};{idx}\n"));
        }
        let pdf = render(&input);
        let text = text(&pdf);
        // (760 - 17) / 18 = 41 rows per page.
        assert_eq!(pdf.pages, 3);
        assert!(text.contains("/Count 3"));
        assert_eq!(text.matches("(Nama) Tj").count(), 3);
        assert_eq!(text.matches("(siswa99) Tj").count(), 1);
    }

    #[test]
    fn empty_cells_draw_no_text() {
        let text = text(&render("a;b\n;x\n"));
        assert!(!text.contains("() Tj"));
        assert!(!text.contains("NaN"));
    }

    #[test]
    fn output_is_deterministic() {
        let input = "a;b\nx;(y)\n";
        assert_eq!(render(input).bytes, render(input).bytes);
    }

    #[test]
    fn mismatched_widths_are_rejected() {
        let table = parse_table("a;b\n1;2\n").unwrap();
        assert!(generate_pdf_table("t", &table, &[10.0]).is_err());
    }
}
