//! Error types for the merge and export stages.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    /// The patient table repeats a `PATIENT_ID`.
    #[error("patient table {path} repeats PATIENT_ID {patient_id} ({count} duplicate ids)")]
    DuplicatePatientId {
        path: PathBuf,
        patient_id: String,
        count: usize,
    },

    /// A column expected after the join is absent.
    #[error("column '{column}' missing from merged table")]
    MissingMergedColumn { column: String },

    #[error(transparent)]
    Ingest(#[from] cbp_ingest::IngestError),

    /// Failed to write the output file.
    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to encode a CSV record.
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
