//! Sample/patient merge into the trial-match clinical table.
//!
//! The merge runs in fixed stages over Polars frames:
//!
//! 1. **Join**: left join of sample rows to patient rows on `PATIENT_ID`
//! 2. **Derive**: diagnosis name, gender, ethnicity, vital status, cancer type, TMB
//! 3. **Project**: keep the eight working columns in output order
//! 4. **Normalize**: missing cells become `"NA"`
//! 5. **Stamp**: constant `STUDY_ID` column appended last
//!
//! Non-key columns present in both tables are renamed before the join
//! (`<name>_left` on the sample side, `<name>_right` on the patient side).
//! Derived columns look their sources up by table of origin, so such a
//! collision never changes which table a value is read from.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use cbp_ingest::ClinicalTable;
use cbp_model::columns::{
    CANCER_TYPE, CANCER_TYPE_DETAILED, ETHNICITY, GENDER, ONCOTREE_CODE,
    ONCOTREE_PRIMARY_DIAGNOSIS_NAME, OS_STATUS, SAMPLE_ID, SEX, STUDY_ID, TMB_NONSYNONYMOUS,
    TUMOR_MUTATIONAL_BURDEN_PER_MEGABASE, VITAL_STATUS,
};
use cbp_model::{
    Diagnostics, JOIN_KEY, MergeEvent, NA, PATIENT_ORIGIN_COLUMNS, PATIENT_REQUIRED_COLUMNS,
    SAMPLE_ORIGIN_COLUMNS, SAMPLE_REQUIRED_COLUMNS, TableRole, WORKING_COLUMNS,
};
use polars::prelude::*;

use crate::error::{Result, TransformError};
use crate::mapper::map_tmb_nonsynonymous;

/// Internal column carrying the sample row number through the join.
const SAMPLE_ROW: &str = "__sample_row";

const LEFT_SUFFIX: &str = "_left";
const RIGHT_SUFFIX: &str = "_right";

/// Options controlling the merge.
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Accept repeated `PATIENT_ID` values in the patient table.
    ///
    /// When false (default) a repeated id is an error. When true the join fans
    /// out and each matching sample row appears once per patient row.
    pub allow_duplicate_patients: bool,
}

impl MergeOptions {
    #[must_use]
    pub fn with_allow_duplicate_patients(mut self, allow: bool) -> Self {
        self.allow_duplicate_patients = allow;
        self
    }
}

/// The finished trial-match table: nine String columns, no missing cells.
#[derive(Debug, Clone)]
pub struct TrialMatchTable {
    df: DataFrame,
    unmatched_samples: usize,
}

impl TrialMatchTable {
    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Column names in output order.
    pub fn columns(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Sample rows that found no patient record.
    pub fn unmatched_samples(&self) -> usize {
        self.unmatched_samples
    }

    /// Values of one output column, top to bottom.
    pub fn column_values(&self, name: &str) -> Result<Vec<String>> {
        let ca = self
            .df
            .column(name)
            .map_err(|_| TransformError::MissingMergedColumn {
                column: name.to_string(),
            })?
            .str()?;
        Ok(ca
            .into_iter()
            .map(|value| value.unwrap_or(NA).to_string())
            .collect())
    }

    /// All rows as strings, in output column order.
    pub fn rows(&self) -> Result<Vec<Vec<String>>> {
        let columns: Vec<&StringChunked> = self
            .df
            .get_columns()
            .iter()
            .map(|column| column.str())
            .collect::<PolarsResult<_>>()?;
        Ok((0..self.df.height())
            .map(|idx| {
                columns
                    .iter()
                    .map(|ca| ca.get(idx).unwrap_or(NA).to_string())
                    .collect()
            })
            .collect())
    }
}

/// Merges sample and patient tables into the trial-match table.
///
/// Both tables must carry their required columns. The result has one row per
/// sample row (more only when duplicate patients are allowed and present).
pub fn merge_clinical_records(
    sample: &ClinicalTable,
    patient: &ClinicalTable,
    study_id: &str,
    options: &MergeOptions,
    diagnostics: &dyn Diagnostics,
) -> Result<TrialMatchTable> {
    sample.require_columns(SAMPLE_REQUIRED_COLUMNS, TableRole::Sample)?;
    patient.require_columns(PATIENT_REQUIRED_COLUMNS, TableRole::Patient)?;
    check_patient_keys(patient, options, diagnostics)?;

    let (sample_frame, patient_frame, sources) =
        prepare_join_frames(sample, patient, diagnostics)?;
    let mut merged = join_frames(sample_frame, patient_frame)?;
    let unmatched_samples = count_unmatched_samples(sample, patient);
    diagnostics.record(&MergeEvent::Joined {
        rows: merged.height(),
        unmatched_samples,
    });

    derive_columns(&mut merged, sample, &sources)?;
    let mut df = project_working_columns(&merged)?;
    let cells = fill_missing(&mut df)?;
    diagnostics.record(&MergeEvent::MissingFilled { cells });
    trim_column(&mut df, ONCOTREE_PRIMARY_DIAGNOSIS_NAME)?;
    stamp_study_id(&mut df, study_id)?;

    Ok(TrialMatchTable {
        df,
        unmatched_samples,
    })
}

/// Post-join column names of the fields the derivations read.
///
/// A field's table of origin comes from [`SAMPLE_ORIGIN_COLUMNS`] and
/// [`PATIENT_ORIGIN_COLUMNS`]; only a renamed collision changes its name.
#[derive(Debug, Clone)]
struct SourceColumns {
    renamed: BTreeMap<String, (String, String)>,
}

impl SourceColumns {
    fn resolve(&self, name: &str) -> String {
        let Some((left, right)) = self.renamed.get(name) else {
            return name.to_string();
        };
        if SAMPLE_ORIGIN_COLUMNS.contains(&name) {
            left.clone()
        } else if PATIENT_ORIGIN_COLUMNS.contains(&name) {
            right.clone()
        } else {
            name.to_string()
        }
    }
}

fn check_patient_keys(
    patient: &ClinicalTable,
    options: &MergeOptions,
    diagnostics: &dyn Diagnostics,
) -> Result<()> {
    let mut seen = HashSet::new();
    let mut duplicates = BTreeSet::new();
    for id in patient
        .column_values(JOIN_KEY)
        .unwrap_or_default()
        .into_iter()
        .flatten()
    {
        if !seen.insert(id) {
            duplicates.insert(id.to_string());
        }
    }
    let Some(first) = duplicates.first().cloned() else {
        return Ok(());
    };
    if !options.allow_duplicate_patients {
        return Err(TransformError::DuplicatePatientId {
            path: patient.path.clone(),
            patient_id: first,
            count: duplicates.len(),
        });
    }
    diagnostics.record(&MergeEvent::DuplicatePatients {
        patient_ids: duplicates.into_iter().collect(),
    });
    Ok(())
}

/// Renames colliding columns and builds the two frames to join.
fn prepare_join_frames(
    sample: &ClinicalTable,
    patient: &ClinicalTable,
    diagnostics: &dyn Diagnostics,
) -> Result<(DataFrame, DataFrame, SourceColumns)> {
    let mut sample = sample.clone();
    let mut patient = patient.clone();
    let collisions: Vec<String> = sample
        .headers
        .iter()
        .filter(|name| name.as_str() != JOIN_KEY && patient.has_column(name))
        .cloned()
        .collect();

    let mut renamed = BTreeMap::new();
    for column in collisions {
        let left = format!("{column}{LEFT_SUFFIX}");
        let right = format!("{column}{RIGHT_SUFFIX}");
        sample.rename_column(&column, &left);
        patient.rename_column(&column, &right);
        diagnostics.record(&MergeEvent::ColumnsRenamed {
            column: column.clone(),
            left: left.clone(),
            right: right.clone(),
        });
        renamed.insert(column, (left, right));
    }

    let mut sample_frame = sample.to_dataframe()?;
    let row_numbers: Vec<u32> = (0..sample_frame.height())
        .map(|idx| u32::try_from(idx).unwrap_or(u32::MAX))
        .collect();
    sample_frame.with_column(Series::new(SAMPLE_ROW.into(), row_numbers))?;
    let patient_frame = patient.to_dataframe()?;

    Ok((sample_frame, patient_frame, SourceColumns { renamed }))
}

/// Left join on `PATIENT_ID`, rows returned in sample order.
fn join_frames(sample: DataFrame, patient: DataFrame) -> Result<DataFrame> {
    let joined = sample
        .lazy()
        .join(
            patient.lazy(),
            [col(JOIN_KEY)],
            [col(JOIN_KEY)],
            JoinArgs::new(JoinType::Left),
        )
        .sort(
            [SAMPLE_ROW],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?;
    Ok(joined)
}

fn count_unmatched_samples(sample: &ClinicalTable, patient: &ClinicalTable) -> usize {
    let patient_ids: HashSet<&str> = patient
        .column_values(JOIN_KEY)
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .collect();
    sample
        .column_values(JOIN_KEY)
        .unwrap_or_default()
        .into_iter()
        .filter(|id| id.is_none_or(|id| !patient_ids.contains(id)))
        .count()
}

fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .map_err(|_| TransformError::MissingMergedColumn {
            column: name.to_string(),
        })?;
    Ok(column
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

/// Adds the derived output columns to the joined frame.
///
/// The diagnosis name is read from the original sample table through the
/// carried row number, not from the joined frame.
fn derive_columns(
    merged: &mut DataFrame,
    sample: &ClinicalTable,
    sources: &SourceColumns,
) -> Result<()> {
    let detailed = sample
        .column_values(CANCER_TYPE_DETAILED)
        .unwrap_or_default();
    let diagnosis: Vec<Option<String>> = merged
        .column(SAMPLE_ROW)?
        .u32()?
        .into_iter()
        .map(|row| {
            row.and_then(|row| detailed.get(row as usize).copied().flatten())
                .map(|value| value.trim().to_string())
        })
        .collect();

    let sex = string_values(merged, &sources.resolve(SEX))?;
    let vital_status = string_values(merged, &sources.resolve(OS_STATUS))?;
    let oncotree = string_values(merged, &sources.resolve(ONCOTREE_CODE))?;
    let tmb: Vec<String> = string_values(merged, &sources.resolve(TMB_NONSYNONYMOUS))?
        .iter()
        .map(|value| map_tmb_nonsynonymous(value.as_deref()))
        .collect();
    let sample_id = string_values(merged, &sources.resolve(SAMPLE_ID))?;

    // The free-text cancer type is replaced by the oncotree code.
    let original_cancer_type = sources.resolve(CANCER_TYPE);
    if merged.column(&original_cancer_type).is_ok() {
        merged.drop_in_place(&original_cancer_type)?;
    }

    merged.with_column(Series::new(SAMPLE_ID.into(), sample_id))?;
    merged.with_column(Series::new(ONCOTREE_PRIMARY_DIAGNOSIS_NAME.into(), diagnosis))?;
    merged.with_column(Series::new(GENDER.into(), sex.clone()))?;
    // ETHNICITY mirrors SEX; no ethnicity field is read from the patient file.
    merged.with_column(Series::new(ETHNICITY.into(), sex))?;
    merged.with_column(Series::new(VITAL_STATUS.into(), vital_status))?;
    merged.with_column(Series::new(CANCER_TYPE.into(), oncotree))?;
    merged.with_column(Series::new(TUMOR_MUTATIONAL_BURDEN_PER_MEGABASE.into(), tmb))?;
    Ok(())
}

/// Keeps the working columns, in output order.
fn project_working_columns(merged: &DataFrame) -> Result<DataFrame> {
    for name in WORKING_COLUMNS {
        if merged.column(name).is_err() {
            return Err(TransformError::MissingMergedColumn {
                column: name.to_string(),
            });
        }
    }
    Ok(merged.select(WORKING_COLUMNS)?)
}

/// Replaces every missing cell with `"NA"`. Returns the number of cells filled.
fn fill_missing(df: &mut DataFrame) -> Result<usize> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let mut filled = 0usize;
    for name in names {
        let values = string_values(df, &name)?;
        let missing = values.iter().filter(|value| value.is_none()).count();
        if missing == 0 {
            continue;
        }
        filled += missing;
        let values: Vec<String> = values
            .into_iter()
            .map(|value| value.unwrap_or_else(|| NA.to_string()))
            .collect();
        df.with_column(Series::new(name.as_str().into(), values))?;
    }
    Ok(filled)
}

fn trim_column(df: &mut DataFrame, name: &str) -> Result<()> {
    let trimmed: Vec<Option<String>> = string_values(df, name)?
        .into_iter()
        .map(|value| value.map(|v| v.trim().to_string()))
        .collect();
    df.with_column(Series::new(name.into(), trimmed))?;
    Ok(())
}

/// Appends `STUDY_ID` with the same value on every row.
fn stamp_study_id(df: &mut DataFrame, study_id: &str) -> Result<()> {
    let column = Column::new(STUDY_ID.into(), vec![study_id; df.height()]);
    df.with_column(column)?;
    Ok(())
}
