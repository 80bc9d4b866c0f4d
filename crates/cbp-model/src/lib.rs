//! Shared vocabulary for the cBioPortal clinical export.
//!
//! This crate owns the column names read from cBioPortal clinical files, the
//! fixed trial-match output schema, the missing-value sentinels, and the
//! diagnostics events emitted while merging. It has no I/O of its own.

pub mod columns;
pub mod diagnostics;
pub mod missing;

pub use columns::{
    JOIN_KEY, NA, OUTPUT_COLUMNS, PATIENT_ORIGIN_COLUMNS, PATIENT_REQUIRED_COLUMNS,
    SAMPLE_ORIGIN_COLUMNS, SAMPLE_REQUIRED_COLUMNS, WORKING_COLUMNS,
};
pub use diagnostics::{
    Diagnostics, MergeEvent, NullDiagnostics, TableRole, TracingDiagnostics,
};
pub use missing::{MISSING_TOKENS, is_missing_token};
