//! CSV serialization of the trial-match table.
//!
//! Comma-delimited, header row first, `\n` line endings, quoting only where a
//! value needs it, no index column.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{Result, TransformError};
use crate::merge::TrialMatchTable;

fn csv_writer<W: Write>(inner: W) -> csv::Writer<W> {
    WriterBuilder::new()
        .delimiter(b',')
        .terminator(Terminator::Any(b'\n'))
        .quote_style(QuoteStyle::Necessary)
        .from_writer(inner)
}

fn write_records<W: Write>(table: &TrialMatchTable, writer: &mut csv::Writer<W>) -> Result<()> {
    writer.write_record(table.columns())?;
    for row in table.rows()? {
        writer.write_record(&row)?;
    }
    Ok(())
}

/// Renders the table as CSV text.
pub fn to_csv_string(table: &TrialMatchTable) -> Result<String> {
    let mut writer = csv_writer(Vec::new());
    write_records(table, &mut writer)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| TransformError::Csv(e.into_error().into()))?;
    // Every cell came from a Rust `String`.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Writes the table to `path`, replacing any existing file.
///
/// A failure after the file was created removes it, so a failed run never
/// leaves a truncated export behind.
pub fn write_trial_match_csv(table: &TrialMatchTable, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| TransformError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    let result = write_file(table, file).map_err(|e| match e {
        TransformError::Csv(err) if err.is_io_error() => TransformError::FileWrite {
            path: path.to_path_buf(),
            source: std::io::Error::other(err.to_string()),
        },
        other => other,
    });
    if result.is_err() {
        let _ = std::fs::remove_file(path);
    }
    result
}

fn write_file(table: &TrialMatchTable, file: File) -> Result<()> {
    let mut writer = csv_writer(BufWriter::new(file));
    write_records(table, &mut writer)?;
    writer.flush().map_err(|e| TransformError::Csv(e.into()))
}
