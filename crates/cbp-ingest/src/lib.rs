//! cBioPortal clinical data ingestion.
//!
//! This crate reads the inputs of a cBioPortal study folder into memory:
//!
//! - **Clinical tables**: `data_clinical_sample.txt` / `data_clinical_patient.txt`,
//!   tab-delimited with a four-line `#` preamble before the header row
//! - **Study metadata**: `meta_study.txt`, `key: value` lines, of which
//!   `cancer_study_identifier` names the study
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use cbp_ingest::{LoadOptions, read_clinical_table, require_study_identifier};
//!
//! let study_dir = Path::new("studies/brca_pps");
//! let samples = read_clinical_table(&study_dir.join("data_clinical_sample.txt"), &LoadOptions::default())?;
//! let study_id = require_study_identifier(&study_dir.join("meta_study.txt"))?;
//! ```

mod error;
mod study;
mod table;

// === Error Types ===
pub use error::{IngestError, Result};

// === Clinical Tables ===
pub use table::{ClinicalTable, DEFAULT_PREAMBLE_LINES, LoadOptions, read_clinical_table};

// === Study Metadata ===
pub use study::{
    STUDY_IDENTIFIER_KEY, StudyMetadata, parse_study_identifier, read_study_identifier,
    read_study_metadata, require_study_identifier,
};
