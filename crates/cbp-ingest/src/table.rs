//! Tab-delimited cBioPortal clinical tables.
//!
//! cBioPortal clinical files open with a `#`-prefixed preamble (display names,
//! descriptions, datatypes, priorities) followed by the real header row:
//!
//! ```text
//! #Patient Identifier<TAB>Sex<TAB>Overall Survival Status
//! #Identifier to uniquely specify a patient.<TAB>Sex<TAB>Overall patient survival status.
//! #STRING<TAB>STRING<TAB>STRING
//! #1<TAB>1<TAB>1
//! PATIENT_ID<TAB>SEX<TAB>OS_STATUS
//! P1<TAB>Female<TAB>LIVING
//! ```

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use cbp_model::{TableRole, is_missing_token};
use csv::ReaderBuilder;
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

use crate::error::{IngestError, Result};

/// Number of non-data lines before the header row in cBioPortal clinical files.
pub const DEFAULT_PREAMBLE_LINES: usize = 4;

/// Options for reading a clinical table.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Records skipped before the header row.
    pub preamble_lines: usize,
    /// Field delimiter.
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            preamble_lines: DEFAULT_PREAMBLE_LINES,
            delimiter: b'\t',
        }
    }
}

impl LoadOptions {
    /// Set the number of preamble records to skip.
    #[must_use]
    pub fn with_preamble_lines(mut self, lines: usize) -> Self {
        self.preamble_lines = lines;
        self
    }

    /// Set the field delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// A clinical table held in memory. Missing cells are `None`.
#[derive(Debug, Clone)]
pub struct ClinicalTable {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl ClinicalTable {
    /// Number of data rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Values of one column, top to bottom.
    pub fn column_values(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).and_then(|cell| cell.as_deref()))
                .collect(),
        )
    }

    /// Fails on the first name in `columns` this table does not have.
    pub fn require_columns(&self, columns: &[&str], role: TableRole) -> Result<()> {
        match columns.iter().find(|name| !self.has_column(name)) {
            Some(missing) => Err(IngestError::MissingColumn {
                column: (*missing).to_string(),
                table: role.to_string(),
                path: self.path.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Renames a column in place. Returns false if `from` does not exist.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_index(from) {
            Some(idx) => {
                self.headers[idx] = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Converts the table to a DataFrame of String columns.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let columns: Vec<Column> = self
            .headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let values: Vec<Option<&str>> = self
                    .rows
                    .iter()
                    .map(|row| row.get(idx).and_then(|cell| cell.as_deref()))
                    .collect();
                Series::new(name.as_str().into(), values).into_column()
            })
            .collect();
        Ok(DataFrame::new(columns)?)
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

fn normalize_cell(raw: &str) -> Option<String> {
    if is_missing_token(raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Reads a clinical table, skipping the preamble and taking the next record as header.
///
/// The preamble is counted in raw lines, blank ones included, so the header is
/// always line `preamble_lines + 1`. Rows shorter than the header are padded
/// with missing cells. Rows longer than the header are rejected unless the
/// extra fields are empty.
pub fn read_clinical_table(path: &Path, options: &LoadOptions) -> Result<ClinicalTable> {
    let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
    let mut input = BufReader::new(file);
    skip_preamble(&mut input, path, options)?;

    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut records = reader.records();
    let header_record = match records.next() {
        Some(record) => record.map_err(|e| parse_error(path, &e))?,
        None => return Err(no_header(path, options)),
    };
    let headers: Vec<String> = header_record.iter().map(normalize_header).collect();
    let mut seen = BTreeSet::new();
    for header in &headers {
        if !seen.insert(header.as_str()) {
            return Err(IngestError::DuplicateColumn {
                column: header.clone(),
                path: path.to_path_buf(),
            });
        }
    }

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|e| parse_error(path, &e))?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        if record.len() > headers.len()
            && record.iter().skip(headers.len()).any(|value| !value.is_empty())
        {
            return Err(IngestError::RaggedRow {
                path: path.to_path_buf(),
                line: record
                    .position()
                    .map_or(0, |pos| pos.line() + options.preamble_lines as u64),
                expected: headers.len(),
                found: record.len(),
            });
        }
        let row: Vec<Option<String>> = (0..headers.len())
            .map(|idx| record.get(idx).and_then(normalize_cell))
            .collect();
        rows.push(row);
    }

    Ok(ClinicalTable {
        path: path.to_path_buf(),
        headers,
        rows,
    })
}

/// Consumes `preamble_lines` raw lines from `input`.
fn skip_preamble<R: BufRead>(input: &mut R, path: &Path, options: &LoadOptions) -> Result<()> {
    let mut line = String::new();
    for _ in 0..options.preamble_lines {
        line.clear();
        let read = input
            .read_line(&mut line)
            .map_err(|e| IngestError::io(path, e))?;
        if read == 0 {
            return Err(no_header(path, options));
        }
    }
    Ok(())
}

fn parse_error(path: &Path, error: &csv::Error) -> IngestError {
    IngestError::Parse {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

fn no_header(path: &Path, options: &LoadOptions) -> IngestError {
    IngestError::NoHeaderRow {
        path: path.to_path_buf(),
        preamble_lines: options.preamble_lines,
    }
}
