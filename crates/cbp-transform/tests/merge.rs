//! End-to-end tests: clinical files on disk to trial-match CSV.

use std::fs;
use std::path::{Path, PathBuf};

use cbp_ingest::{LoadOptions, read_clinical_table, require_study_identifier};
use cbp_model::{NA, NullDiagnostics, OUTPUT_COLUMNS};
use cbp_transform::{
    MergeOptions, TrialMatchTable, merge_clinical_records, to_csv_string, write_trial_match_csv,
};
use proptest::prelude::*;
use tempfile::TempDir;

const SAMPLE_PREAMBLE: &str = "\
#Sample Identifier\tPatient Identifier\tCancer Type Detailed\tOncotree Code\tCancer Type\tTMB (nonsynonymous)\tMSI Stability
#Sample id\tPatient id\tDetailed type\tOncotree code\tCancer type\tTMB\tMSI
#STRING\tSTRING\tSTRING\tSTRING\tSTRING\tNUMBER\tSTRING
#1\t1\t1\t1\t1\t1\t1
SAMPLE_ID\tPATIENT_ID\tCANCER_TYPE_DETAILED\tONCOTREE_CODE\tCANCER_TYPE\tTMB_NONSYNONYMOUS\tMSI_STABILITY
";

const PATIENT_PREAMBLE: &str = "\
#Patient Identifier\tSex\tOverall Survival Status\tAge
#Patient id\tSex\tStatus\tAge
#STRING\tSTRING\tSTRING\tNUMBER
#1\t1\t1\t1
PATIENT_ID\tSEX\tOS_STATUS\tAGE
";

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn run(dir: &Path, samples: &str, patients: &str, meta: &str) -> TrialMatchTable {
    let sample_path = write(
        dir,
        "data_clinical_sample.txt",
        &format!("{SAMPLE_PREAMBLE}{samples}"),
    );
    let patient_path = write(
        dir,
        "data_clinical_patient.txt",
        &format!("{PATIENT_PREAMBLE}{patients}"),
    );
    let meta_path = write(dir, "meta_study.txt", meta);

    let options = LoadOptions::default();
    let sample = read_clinical_table(&sample_path, &options).expect("read samples");
    let patient = read_clinical_table(&patient_path, &options).expect("read patients");
    let study_id = require_study_identifier(&meta_path).expect("study id");
    merge_clinical_records(
        &sample,
        &patient,
        &study_id,
        &MergeOptions::default(),
        &NullDiagnostics,
    )
    .expect("merge")
}

#[test]
fn breast_sample_scenario() {
    let dir = TempDir::new().unwrap();
    let table = run(
        dir.path(),
        "S1\tP1\t Breast \tBRCA\tBreast Cancer\t5.2\tStable\n",
        "P1\tFemale\tLIVING\t54\n",
        "type_of_cancer: brca\ncancer_study_identifier: BRCA_pps\nname: Breast PPS\n",
    );

    insta::assert_snapshot!(to_csv_string(&table).unwrap(), @r"
    SAMPLE_ID,ONCOTREE_PRIMARY_DIAGNOSIS_NAME,CANCER_TYPE,GENDER,ETHNICITY,VITAL_STATUS,PATIENT_ID,TUMOR_MUTATIONAL_BURDEN_PER_MEGABASE,STUDY_ID
    S1,Breast,BRCA,Female,Female,LIVING,P1,5.2,BRCA_pps
    ");
}

#[test]
fn missing_patient_and_empty_tmb() {
    let dir = TempDir::new().unwrap();
    let table = run(
        dir.path(),
        "S1\tP1\tBreast\tBRCA\tBreast Cancer\t\tHigh\nS2\tP2\tLung Adenocarcinoma\tLUAD\tLung Cancer\t3\t\n",
        "P1\tFemale\t\t54\n",
        "cancer_study_identifier: MIXED\n",
    );

    let rows = table.rows().unwrap();
    assert_eq!(
        rows[0],
        vec!["S1", "Breast", "BRCA", "Female", "Female", "NA", "P1", "NA", "MIXED"]
    );
    assert_eq!(
        rows[1],
        vec![
            "S2",
            "Lung Adenocarcinoma",
            "LUAD",
            "NA",
            "NA",
            "NA",
            "P2",
            "3",
            "MIXED"
        ]
    );
}

#[test]
fn values_with_commas_are_quoted() {
    let dir = TempDir::new().unwrap();
    let table = run(
        dir.path(),
        "S1\tP1\tBreast, invasive\tBRCA\tBreast Cancer\t1\tStable\n",
        "P1\tFemale\tLIVING\t54\n",
        "cancer_study_identifier: Q\n",
    );

    let csv = to_csv_string(&table).unwrap();
    assert!(csv.contains("S1,\"Breast, invasive\",BRCA"));
    assert!(csv.ends_with("Q\n"));
    assert!(!csv.contains('\r'));
}

#[test]
fn write_creates_file_with_header() {
    let dir = TempDir::new().unwrap();
    let table = run(
        dir.path(),
        "S1\tP1\tBreast\tBRCA\tBreast Cancer\t1\tStable\n",
        "P1\tFemale\tLIVING\t54\n",
        "cancer_study_identifier: W\n",
    );
    let out = dir.path().join("clinical.csv");

    write_trial_match_csv(&table, &out).unwrap();

    let written = fs::read_to_string(&out).unwrap();
    assert_eq!(written, to_csv_string(&table).unwrap());
    assert_eq!(written.lines().count(), 2);
    assert_eq!(
        written.lines().next().unwrap(),
        OUTPUT_COLUMNS.join(",")
    );
}

#[test]
fn write_to_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let table = run(
        dir.path(),
        "S1\tP1\tBreast\tBRCA\tBreast Cancer\t1\tStable\n",
        "P1\tFemale\tLIVING\t54\n",
        "cancer_study_identifier: W\n",
    );
    let out = dir.path().join("missing").join("clinical.csv");

    let result = write_trial_match_csv(&table, &out);

    assert!(matches!(
        result,
        Err(cbp_transform::TransformError::FileWrite { .. })
    ));
    assert!(!out.exists());
}

fn arb_detail() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[A-Za-z0-9 ]{1,8}"]
}

fn arb_tmb() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[0-9]{1,3}(\\.[0-9]{1,2})?"]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn one_output_row_per_sample_and_no_missing_cells(
        rows in proptest::collection::vec((0u8..6, arb_detail(), arb_tmb()), 0..12)
    ) {
        let dir = TempDir::new().unwrap();
        let samples: String = rows
            .iter()
            .enumerate()
            .map(|(idx, (patient, detail, tmb))| {
                format!("S{idx}\tP{patient}\tx{detail}\tCODE\tType\t{tmb}\t\n")
            })
            .collect();
        let patients = "P0\tFemale\tLIVING\t1\nP2\tMale\tDECEASED\t2\nP4\t\t\t3\n";
        let table = run(dir.path(), &samples, patients, "cancer_study_identifier: PROP\n");

        prop_assert_eq!(table.height(), rows.len());
        prop_assert_eq!(table.columns(), OUTPUT_COLUMNS.to_vec());
        for row in table.rows().unwrap() {
            prop_assert_eq!(row.len(), OUTPUT_COLUMNS.len());
            prop_assert_eq!(row[8].as_str(), "PROP");
            prop_assert!(row.iter().all(|cell| !cell.is_empty()));
        }
        for (row, (_, _, tmb)) in table.rows().unwrap().iter().zip(&rows) {
            let expected = if tmb.is_empty() { NA } else { tmb.as_str() };
            prop_assert_eq!(row[7].as_str(), expected);
        }
    }
}
