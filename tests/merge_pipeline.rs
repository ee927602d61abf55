use std::io::Write;

use tempfile::{Builder, NamedTempFile};

use neuro_cohort::config::ColumnConfig;
use neuro_cohort::data::{self, Record, RecordCollection, Table};
use neuro_cohort::error::{DataError, SkipReason, Warning};

fn write_temp(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const LUMINEX: &str = "\
Donor ID,ABeta40 pg/ug,ABeta42 pg/ug,tTAU pg/ug,pTAU pg/ug
A,10.0,20.0,5.0,1.0
B,11.0,,6.0,2.0
";

const METADATA: &str = "\
Donor ID,Sex,Age at Death,Highest level of education,Cognitive Status,Age of onset cognitive symptoms,Age of Dementia diagnosis,Known head injury,Thal
A,Female,,Bachelors,,,,,Thal 2
C,Male,80,High School,Dementia,75,77,No,Thal 4
";

fn load_and_merge(luminex: &str, metadata: &str) -> (RecordCollection, Vec<Warning>) {
    let columns = ColumnConfig::default();
    let lum = write_temp(".csv", luminex);
    let meta = write_temp(".csv", metadata);

    let lum_table = data::read_table(lum.path()).unwrap();
    let meta_table = data::read_table(meta.path()).unwrap();

    let loaded = data::load_records(&lum_table, &columns.biomarker).unwrap();
    let mut records = loaded.records;
    let mut warnings = loaded.warnings;
    warnings.extend(data::merge_metadata(&mut records, &meta_table, &columns.metadata).unwrap());
    (records, warnings)
}

#[test]
fn end_to_end_scenario() {
    let (records, warnings) = load_and_merge(LUMINEX, METADATA);

    assert_eq!(records.len(), 1);
    let a = records.get("A").expect("record A");
    assert_eq!(a.sex.as_deref(), Some("Female"));
    assert_eq!(a.education_level.as_deref(), Some("Bachelors"));
    assert_eq!(a.neuropathology_score, Some(2));
    assert_eq!(a.death_age, None);
    assert_eq!(a.cognitive_status, None);

    let b = a.biomarkers();
    assert_eq!(
        (b.amyloid_beta_40, b.amyloid_beta_42, b.total_tau, b.phospho_tau),
        (10.0, 20.0, 5.0, 1.0)
    );

    assert!(records.get("B").is_none());
    assert!(records.get("C").is_none());
    assert_eq!(
        warnings,
        vec![
            Warning::RowSkip {
                row: 1,
                reason: SkipReason::MissingMeasurement {
                    id: "B".into(),
                    column: "ABeta42 pg/ug".into(),
                },
            },
            Warning::LookupMiss { row: 1, id: "C".into() },
        ]
    );
}

#[test]
fn merge_is_idempotent() {
    let columns = ColumnConfig::default();
    let lum = data::read_table(write_temp(".csv", LUMINEX).path()).unwrap();
    let meta = data::read_table(write_temp(".csv", METADATA).path()).unwrap();

    let mut once = data::load_records(&lum, &columns.biomarker).unwrap().records;
    data::merge_metadata(&mut once, &meta, &columns.metadata).unwrap();

    let mut twice = once.clone();
    data::merge_metadata(&mut twice, &meta, &columns.metadata).unwrap();

    assert_eq!(once.records(), twice.records());
}

#[test]
fn every_non_empty_metadata_field_is_joined() {
    let columns = ColumnConfig::default();
    let lum = Table::from_records(
        &columns.biomarker.required(),
        vec![vec!["X1", "1", "2", "3", "4"], vec!["X2", "5", "6", "7", "8"]],
    );
    let m = &columns.metadata;
    let meta = Table::from_records(
        &[
            &m.id,
            &m.sex,
            &m.death_age,
            &m.education_level,
            &m.cognitive_status,
            &m.symptom_onset_age,
            &m.diagnosis_age,
            &m.head_injury,
            &m.neuropathology_score,
        ],
        vec![
            vec!["X2", "Male", "91", "Graduate", "Dementia", "80", "84", "Yes", "5"],
            vec!["X1", "", "", "", "", "", "", "", ""],
        ],
    );

    let mut records = data::load_records(&lum, &columns.biomarker).unwrap().records;
    let warnings = data::merge_metadata(&mut records, &meta, m).unwrap();
    assert!(warnings.is_empty());

    let x2 = records.get("X2").unwrap();
    assert_eq!(x2.sex.as_deref(), Some("Male"));
    assert_eq!(x2.death_age, Some(91));
    assert_eq!(x2.education_level.as_deref(), Some("Graduate"));
    assert_eq!(x2.cognitive_status.as_deref(), Some("Dementia"));
    assert_eq!(x2.symptom_onset_age, Some(80));
    assert_eq!(x2.diagnosis_age, Some(84));
    assert_eq!(x2.head_injury.as_deref(), Some("Yes"));
    assert_eq!(x2.neuropathology_score, Some(5));

    let x1: &Record = records.get("X1").unwrap();
    assert_eq!(x1.sex, None);
    assert_eq!(x1.death_age, None);
    assert_eq!(x1.neuropathology_score, None);
}

#[test]
fn metadata_never_grows_the_collection() {
    let extra: String = (0..20)
        .map(|i| format!("Z{i},Female,70,,,,,,Thal 1\n"))
        .collect();
    let metadata = format!("{METADATA}{extra}");
    let (records, warnings) = load_and_merge(LUMINEX, &metadata);
    assert_eq!(records.len(), 1);
    assert_eq!(
        warnings
            .iter()
            .filter(|w| matches!(w, Warning::LookupMiss { .. }))
            .count(),
        21
    );
}

#[test]
fn missing_required_column_aborts_load() {
    let columns = ColumnConfig::default();
    let lum = write_temp(".csv", "Donor ID,ABeta40 pg/ug,ABeta42 pg/ug,tTAU pg/ug\nA,1,2,3\n");
    let table = data::read_table(lum.path()).unwrap();
    let err = data::load_records(&table, &columns.biomarker).unwrap_err();
    assert!(err.is_structural());
    assert!(matches!(err, DataError::MissingColumn { .. }));
}

#[test]
fn custom_headers_from_column_config() {
    let cfg = write_temp(
        ".json",
        r#"{"biomarker": {"id": "Subject"}, "metadata": {"id": "Subject", "neuropathology_score": "Thal phase"}}"#,
    );
    let columns = ColumnConfig::from_json_file(cfg.path()).unwrap();

    let lum = write_temp(
        ".tsv",
        "Subject\tABeta40 pg/ug\tABeta42 pg/ug\ttTAU pg/ug\tpTAU pg/ug\nS1\t1\t2\t3\t4\n",
    );
    let meta = write_temp(".json", r#"[{"Subject": "S1", "Thal phase": "Thal 3", "Sex": "Male"}]"#);

    let mut records = data::load_records(&data::read_table(lum.path()).unwrap(), &columns.biomarker)
        .unwrap()
        .records;
    data::merge_metadata(&mut records, &data::read_table(meta.path()).unwrap(), &columns.metadata)
        .unwrap();

    let s1 = records.get("S1").unwrap();
    assert_eq!(s1.neuropathology_score, Some(3));
    assert_eq!(s1.sex.as_deref(), Some("Male"));
}
