//! Single-run pipeline: study metadata, clinical tables, merge, export.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use cbp_ingest::{
    ClinicalTable, LoadOptions, read_clinical_table, read_study_metadata,
    require_study_identifier,
};
use cbp_model::{Diagnostics, MergeEvent, TableRole};
use cbp_transform::{MergeOptions, TrialMatchTable, merge_clinical_records, write_trial_match_csv};
use tracing::{debug, info, info_span, trace};

use crate::logging::log_data_enabled;
use crate::types::RunResult;

/// Default file names inside a cBioPortal study folder.
pub const DEFAULT_SAMPLE_FILE: &str = "data_clinical_sample.txt";
pub const DEFAULT_PATIENT_FILE: &str = "data_clinical_patient.txt";
pub const DEFAULT_STUDY_FILE: &str = "meta_study.txt";
pub const DEFAULT_OUTPUT_FILE: &str = "clinical.csv";

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub sample_file: PathBuf,
    pub patient_file: PathBuf,
    pub study_file: PathBuf,
    pub output: PathBuf,
    pub load: LoadOptions,
    pub merge: MergeOptions,
}

impl RunConfig {
    /// Paths inside a study folder, using the cBioPortal default file names.
    pub fn for_study_dir(study_dir: &Path) -> Self {
        Self {
            sample_file: study_dir.join(DEFAULT_SAMPLE_FILE),
            patient_file: study_dir.join(DEFAULT_PATIENT_FILE),
            study_file: study_dir.join(DEFAULT_STUDY_FILE),
            output: study_dir.join(DEFAULT_OUTPUT_FILE),
            load: LoadOptions::default(),
            merge: MergeOptions::default(),
        }
    }

    #[must_use]
    pub fn with_merge_options(mut self, merge: MergeOptions) -> Self {
        self.merge = merge;
        self
    }

    /// Fails on the first input file that does not exist or is not a file.
    pub fn check_inputs(&self) -> Result<()> {
        for (label, path) in [
            ("sample file", &self.sample_file),
            ("patient file", &self.patient_file),
            ("study file", &self.study_file),
        ] {
            if !path.is_file() {
                bail!("{label} not found: {}", path.display());
            }
        }
        Ok(())
    }
}

/// Runs the whole export once.
///
/// The study identifier is resolved before any table is read, and the output
/// file is only created after the merged table is complete.
pub fn run(config: &RunConfig, diagnostics: &dyn Diagnostics) -> Result<RunResult> {
    let start = Instant::now();
    config.check_inputs()?;

    // =========================================================================
    // Stage 1: Study metadata
    // =========================================================================
    let study_id = require_study_identifier(&config.study_file)
        .with_context(|| format!("read study file {}", config.study_file.display()))?;
    let metadata = read_study_metadata(&config.study_file)
        .with_context(|| format!("read study file {}", config.study_file.display()))?;
    let study_span = info_span!("study", study_id = %study_id);
    let _study_guard = study_span.enter();
    debug!(
        name = metadata.name().unwrap_or("-"),
        type_of_cancer = metadata.type_of_cancer().unwrap_or("-"),
        "study metadata loaded"
    );

    // =========================================================================
    // Stage 2: Clinical tables
    // =========================================================================
    let sample = load_table(&config.sample_file, TableRole::Sample, config, diagnostics)?;
    let patient = load_table(&config.patient_file, TableRole::Patient, config, diagnostics)?;

    // =========================================================================
    // Stage 3: Merge
    // =========================================================================
    let merged = info_span!("merge")
        .in_scope(|| {
            merge_clinical_records(&sample, &patient, &study_id, &config.merge, diagnostics)
        })
        .context("merge clinical records")?;
    trace_table(&merged);

    // =========================================================================
    // Stage 4: Export
    // =========================================================================
    write_trial_match_csv(&merged, &config.output)
        .with_context(|| format!("write {}", config.output.display()))?;
    diagnostics.record(&MergeEvent::Written {
        path: config.output.clone(),
        rows: merged.height(),
    });
    info!(
        elapsed_ms = start.elapsed().as_millis(),
        "clinical export complete"
    );

    Ok(RunResult {
        study_id,
        study_name: metadata.name().map(str::to_string),
        output: config.output.clone(),
        sample_rows: sample.height(),
        patient_rows: patient.height(),
        output_rows: merged.height(),
        unmatched_samples: merged.unmatched_samples(),
    })
}

fn load_table(
    path: &Path,
    role: TableRole,
    config: &RunConfig,
    diagnostics: &dyn Diagnostics,
) -> Result<ClinicalTable> {
    let table = info_span!("ingest", role = %role)
        .in_scope(|| read_clinical_table(path, &config.load))
        .with_context(|| format!("read {role} file {}", path.display()))?;
    diagnostics.record(&MergeEvent::TableLoaded {
        role,
        path: path.to_path_buf(),
        rows: table.height(),
        columns: table.width(),
    });
    debug!(role = %role, columns = ?table.headers, "table header");
    if log_data_enabled() {
        for row in &table.rows {
            let cells: Vec<&str> = row
                .iter()
                .map(|cell| cell.as_deref().unwrap_or(""))
                .collect();
            trace!(role = %role, row = ?cells, "input row");
        }
    }
    Ok(table)
}

fn trace_table(merged: &TrialMatchTable) {
    if !log_data_enabled() {
        return;
    }
    if let Ok(rows) = merged.rows() {
        for row in rows {
            trace!(row = ?row, "output row");
        }
    }
}
