//! Error types for clinical data ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading clinical inputs.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Table Parsing Errors ===
    /// Failed to parse a delimited record.
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// File ended before the header row.
    #[error("no header row in {path}: expected {preamble_lines} preamble lines followed by a header")]
    NoHeaderRow {
        path: PathBuf,
        preamble_lines: usize,
    },

    /// A header name appears more than once.
    #[error("duplicate column '{column}' in {path}")]
    DuplicateColumn { column: String, path: PathBuf },

    /// A data row has more fields than the header.
    #[error("{path} line {line}: expected {expected} fields, found {found}")]
    RaggedRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    // === Schema Errors ===
    /// Required column not found in a clinical table.
    #[error("required column '{column}' not found in {table} file {path}")]
    MissingColumn {
        column: String,
        table: String,
        path: PathBuf,
    },

    // === Study Metadata Errors ===
    /// No usable `cancer_study_identifier` line.
    #[error("no cancer_study_identifier line in {path}")]
    MissingStudyIdentifier { path: PathBuf },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl IngestError {
    /// Maps an I/O error on `path`, separating "not found" from other failures.
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/data_clinical_sample.txt"),
        };
        assert_eq!(
            err.to_string(),
            "file not found: /path/to/data_clinical_sample.txt"
        );
    }

    #[test]
    fn test_missing_column_display() {
        let err = IngestError::MissingColumn {
            column: "SEX".to_string(),
            table: "patient".to_string(),
            path: PathBuf::from("p.txt"),
        };
        assert_eq!(
            err.to_string(),
            "required column 'SEX' not found in patient file p.txt"
        );
    }

    #[test]
    fn test_io_not_found_maps_to_file_not_found() {
        let err = IngestError::io(
            std::path::Path::new("x.txt"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(err, IngestError::FileNotFound { .. }));
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }
}
