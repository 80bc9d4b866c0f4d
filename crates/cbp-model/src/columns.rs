//! Column names for cBioPortal clinical inputs and the trial-match output.

/// Column shared by the sample and patient tables.
pub const JOIN_KEY: &str = "PATIENT_ID";

/// Literal written for every missing output cell.
pub const NA: &str = "NA";

// Sample file
pub const SAMPLE_ID: &str = "SAMPLE_ID";
pub const PATIENT_ID: &str = JOIN_KEY;
pub const CANCER_TYPE_DETAILED: &str = "CANCER_TYPE_DETAILED";
pub const ONCOTREE_CODE: &str = "ONCOTREE_CODE";
pub const CANCER_TYPE: &str = "CANCER_TYPE";
pub const TMB_NONSYNONYMOUS: &str = "TMB_NONSYNONYMOUS";

// Patient file
pub const SEX: &str = "SEX";
pub const OS_STATUS: &str = "OS_STATUS";

// Output
pub const ONCOTREE_PRIMARY_DIAGNOSIS_NAME: &str = "ONCOTREE_PRIMARY_DIAGNOSIS_NAME";
pub const GENDER: &str = "GENDER";
pub const ETHNICITY: &str = "ETHNICITY";
pub const VITAL_STATUS: &str = "VITAL_STATUS";
pub const TUMOR_MUTATIONAL_BURDEN_PER_MEGABASE: &str = "TUMOR_MUTATIONAL_BURDEN_PER_MEGABASE";
pub const STUDY_ID: &str = "STUDY_ID";

/// Columns the sample file must provide.
pub const SAMPLE_REQUIRED_COLUMNS: &[&str] = &[
    SAMPLE_ID,
    PATIENT_ID,
    CANCER_TYPE_DETAILED,
    ONCOTREE_CODE,
    CANCER_TYPE,
    TMB_NONSYNONYMOUS,
];

/// Columns the patient file must provide.
pub const PATIENT_REQUIRED_COLUMNS: &[&str] = &[PATIENT_ID, SEX, OS_STATUS];

/// Columns the derivations always read from the sample table.
pub const SAMPLE_ORIGIN_COLUMNS: &[&str] = &[
    SAMPLE_ID,
    CANCER_TYPE_DETAILED,
    ONCOTREE_CODE,
    CANCER_TYPE,
    TMB_NONSYNONYMOUS,
];

/// Columns the derivations always read from the patient table.
pub const PATIENT_ORIGIN_COLUMNS: &[&str] = &[SEX, OS_STATUS];

/// Projected columns before the study identifier is stamped, in output order.
pub const WORKING_COLUMNS: [&str; 8] = [
    SAMPLE_ID,
    ONCOTREE_PRIMARY_DIAGNOSIS_NAME,
    CANCER_TYPE,
    GENDER,
    ETHNICITY,
    VITAL_STATUS,
    PATIENT_ID,
    TUMOR_MUTATIONAL_BURDEN_PER_MEGABASE,
];

/// The exported trial-match schema, in order.
pub const OUTPUT_COLUMNS: [&str; 9] = [
    SAMPLE_ID,
    ONCOTREE_PRIMARY_DIAGNOSIS_NAME,
    CANCER_TYPE,
    GENDER,
    ETHNICITY,
    VITAL_STATUS,
    PATIENT_ID,
    TUMOR_MUTATIONAL_BURDEN_PER_MEGABASE,
    STUDY_ID,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_schema_extends_working_columns_with_study_id() {
        assert_eq!(&OUTPUT_COLUMNS[..8], &WORKING_COLUMNS[..]);
        assert_eq!(OUTPUT_COLUMNS[8], STUDY_ID);
    }

    #[test]
    fn origin_columns_are_required_by_their_table() {
        for name in SAMPLE_ORIGIN_COLUMNS {
            assert!(SAMPLE_REQUIRED_COLUMNS.contains(name), "{name}");
        }
        for name in PATIENT_ORIGIN_COLUMNS {
            assert!(PATIENT_REQUIRED_COLUMNS.contains(name), "{name}");
        }
    }
}
