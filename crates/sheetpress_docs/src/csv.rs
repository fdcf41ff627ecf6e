use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use sheetpress_core::ConvertError;
use tracing::debug;

use crate::table::Table;

/// Field separator of every file this crate reads and writes.
pub const DELIMITER: u8 = b';';

/// Read a semicolon-delimited file into a [`Table`].
///
/// The first record is the header row. Fails with
/// [`ConvertError::NotFound`] when `path` does not exist.
pub fn read_table(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(ConvertError::NotFound(path.to_path_buf()).into());
    }
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let table = parse_table_from_reader(file)
        .with_context(|| format!("Failed to read table from {}", path.display()))?;
    debug!(
        rows = table.row_count(),
        columns = table.column_count(),
        "Read {}",
        path.display()
    );
    Ok(table)
}

/// Parse semicolon-delimited text held in memory.
pub fn parse_table(input: &str) -> Result<Table> {
    parse_table_from_reader(input.as_bytes())
}

/// Parse semicolon-delimited text from any reader.
///
/// Blank lines are skipped. Records shorter than the header are padded with
/// empty cells; longer records are an error.
pub fn parse_table_from_reader<R: Read>(input: R) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()
        .map_err(convert_csv_error)?
        .iter()
        .map(String::from)
        .collect();
    if headers.is_empty() {
        return Err(ConvertError::EmptyInput.into());
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(convert_csv_error)?;
        rows.push(record.iter().map(String::from).collect());
    }

    Table::new(headers, rows)
}

/// Serialize a table back to semicolon-delimited text, header first.
///
/// Fields are quoted only when they contain the delimiter, a quote or a line
/// break. Library API for callers that build tables in code; the binaries
/// only read CSV. The output parses back with [`parse_table`].
pub fn generate_table_csv(table: &Table) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(Vec::new());

    writer
        .write_record(table.headers())
        .context("Failed to write header record")?;
    for row in table.rows() {
        writer
            .write_record(row)
            .context("Failed to write data record")?;
    }

    let bytes = writer.into_inner().context("Failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output contained invalid UTF-8")
}

fn convert_csv_error(err: csv::Error) -> anyhow::Error {
    let line = err.position().map(csv::Position::line).unwrap_or(0);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(io) => ConvertError::Io(io).into(),
        _ => ConvertError::Parse { line, message }.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_semicolon_table() {
        let table = parse_table("Nama;Kelas;Nilai\nAna;1A;90\nBudi;1B;85\n").unwrap();
        assert_eq!(table.headers(), ["Nama", "Kelas", "Nilai"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[1], ["Budi", "1B", "85"]);
    }

    #[test]
    fn commas_are_ordinary_text() {
        let table = parse_table("a;b\n1,5;x, y\n").unwrap();
        assert_eq!(table.rows()[0], ["1,5", "x, y"]);
    }

    #[test]
    fn empty_fields_stay_empty_text() {
        let table = parse_table("a;b;c\n;2;\n").unwrap();
        assert_eq!(table.rows()[0], ["", "2", ""]);
    }

    #[test]
    fn numeric_text_is_not_reformatted() {
        let table = parse_table("id;score\n007;1.50\n").unwrap();
        assert_eq!(table.rows()[0], ["007", "1.50"]);
    }

    #[test]
    fn short_records_are_padded() {
        let table = parse_table("a;b;c\n1\n").unwrap();
        assert_eq!(table.rows()[0], ["1", "", ""]);
    }

    #[test]
    fn long_records_are_rejected() {
        let err = parse_table("a;b\n1;2;3\n").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::RaggedRow { found: 3, .. })
        ));
    }

    #[test]
    fn empty_input_has_no_header() {
        let err = parse_table("").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::EmptyInput)
        ));
    }

    #[test]
    fn header_only_input_is_a_table_without_rows() {
        let table = parse_table("a;bb\n").unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn quoted_fields_may_hold_delimiters_and_newlines() {
        let table = parse_table("a;b\n\"x;y\";\"line1\nline2\"\n").unwrap();
        assert_eq!(table.rows()[0], ["x;y", "line1\nline2"]);
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let bytes: &[u8] = b"a;b\n\xff\xfe;1\n";
        let err = parse_table_from_reader(bytes).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let err = read_table(&tmp.path().join("absent.csv")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::NotFound(_))
        ));
    }

    #[test]
    fn generated_csv_reads_back() {
        let table = parse_table("a;b\n\"x;y\";2\n;\n").unwrap();
        let text = generate_table_csv(&table).unwrap();
        assert!(text.starts_with("a;b\n"));
        assert!(text.contains("\"x;y\";2"));
        assert_eq!(parse_table(&text).unwrap(), table);
    }
}
