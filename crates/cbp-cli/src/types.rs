use std::path::PathBuf;

/// Outcome of one successful run.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub study_id: String,
    pub study_name: Option<String>,
    pub output: PathBuf,
    pub sample_rows: usize,
    pub patient_rows: usize,
    pub output_rows: usize,
    pub unmatched_samples: usize,
}
