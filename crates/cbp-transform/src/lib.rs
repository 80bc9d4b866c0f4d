//! Trial-match clinical table construction.
//!
//! - [`mapper`]: per-value normalization of MSI status and TMB
//! - [`merge`]: sample/patient left join, derived columns, NA fill, study stamp
//! - [`writer`]: CSV serialization of the finished table

pub mod error;
pub mod mapper;
pub mod merge;
pub mod writer;

pub use error::{Result, TransformError};
pub use mapper::{MS_STATUS_VOCABULARY, map_ms_status, map_tmb_nonsynonymous};
pub use merge::{MergeOptions, TrialMatchTable, merge_clinical_records};
pub use writer::{to_csv_string, write_trial_match_csv};
