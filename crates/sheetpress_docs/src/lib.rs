// CSV to document conversion (PDF table, XLSX workbook)

pub mod convert;
pub mod csv;
pub mod paths;
pub mod pdf;
pub mod sizing;
pub mod style;
pub mod table;
pub mod xlsx;

pub use convert::{Conversion, convert, convert_csv_to_pdf, convert_csv_to_xlsx};
pub use paths::{OutputKind, derive_output_path};
pub use table::Table;
