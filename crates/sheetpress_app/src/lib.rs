//! Shared entry point of the `csv2pdf` and `csv2xlsx` binaries.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

use sheetpress_core::{SheetpressConfig, classify_error, logging};
use sheetpress_docs::{Conversion, OutputKind, convert};

/// Convert a semicolon-delimited CSV file; the output is written next to it.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Cli {
    /// Input file, must end in `.csv`
    pub input: PathBuf,
}

/// Parse arguments, set up logging, convert, print the confirmation line.
pub fn main_for(kind: OutputKind) -> Result<()> {
    let cli = Cli::parse();
    let config = SheetpressConfig::load();
    let _guard = logging::init_logging(&config)?;

    let conversion = run(&cli.input, kind)?;
    println!("{}", confirmation(kind, &conversion));
    Ok(())
}

/// Convert `input` into `kind`, logging the outcome.
///
/// Failures are returned, not printed; `main` reports them once.
pub fn run(input: &Path, kind: OutputKind) -> Result<Conversion> {
    info!("Converting {} to {}", input.display(), kind.extension());
    let conversion = convert(input, kind).inspect_err(|e| {
        debug!(category = ?classify_error(e), "Conversion failed: {e:#}");
    })?;
    info!(
        rows = conversion.rows,
        columns = conversion.columns,
        "Converted {}",
        input.display()
    );
    Ok(conversion)
}

/// The single line printed on success.
pub fn confirmation(kind: OutputKind, conversion: &Conversion) -> String {
    format!(
        "{} file saved to: {}",
        kind.label(),
        conversion.output.display()
    )
}
