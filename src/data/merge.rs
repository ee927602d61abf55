use std::collections::HashMap;

use crate::config::MetadataColumns;
use crate::error::{DataError, Result, Warning};

use super::model::{Record, RecordCollection};
use super::source::{cell, Row, Table};

/// Enrich existing records with the clinical metadata table, joining on the
/// trimmed donor identifier.
///
/// Metadata rows never create records: rows with an empty identifier are
/// ignored, rows with an unknown identifier are dropped with a
/// [`Warning::LookupMiss`]. When several rows share an identifier only the
/// last one is applied, as a whole. Only non-empty cells are written, so
/// re-running the merge is idempotent and blank cells never clear a value.
pub fn merge_metadata(
    records: &mut RecordCollection,
    table: &Table,
    columns: &MetadataColumns,
) -> Result<Vec<Warning>> {
    if !table.has_column(&columns.id) {
        return Err(DataError::MissingColumn {
            table: "metadata",
            column: columns.id.clone(),
        });
    }

    let mut warnings = Vec::new();
    let mut latest: HashMap<&str, &Row> = HashMap::new();
    for (row_no, row) in table.rows.iter().enumerate() {
        let id = cell(row, &columns.id).trim();
        if id.is_empty() {
            continue;
        }
        if records.contains(id) {
            latest.insert(id, row);
        } else {
            let warning = Warning::LookupMiss {
                row: row_no,
                id: id.to_string(),
            };
            log::warn!("{warning}");
            warnings.push(warning);
        }
    }

    for (id, row) in &latest {
        if let Some(record) = records.get_mut(id) {
            apply_row(record, row, columns);
        }
    }
    for record in records.iter().filter(|r| !latest.contains_key(r.id())) {
        log::debug!("ID {} not found in metadata", record.id());
    }

    log::info!(
        "Merged metadata for {} of {} records ({} rows unmatched)",
        latest.len(),
        records.len(),
        warnings.len()
    );
    Ok(warnings)
}

fn apply_row(record: &mut Record, row: &Row, columns: &MetadataColumns) {
    set_text(&mut record.sex, row, &columns.sex);
    set_int(&mut record.death_age, row, &columns.death_age, parse_int);
    set_text(&mut record.education_level, row, &columns.education_level);
    set_text(&mut record.cognitive_status, row, &columns.cognitive_status);
    set_int(&mut record.symptom_onset_age, row, &columns.symptom_onset_age, parse_int);
    set_int(&mut record.diagnosis_age, row, &columns.diagnosis_age, parse_int);
    set_text(&mut record.head_injury, row, &columns.head_injury);
    set_int(
        &mut record.neuropathology_score,
        row,
        &columns.neuropathology_score,
        parse_thal_score,
    );
}

fn set_text(field: &mut Option<String>, row: &Row, column: &str) {
    let text = cell(row, column).trim();
    if !text.is_empty() {
        *field = Some(text.to_string());
    }
}

fn set_int(field: &mut Option<i64>, row: &Row, column: &str, parse: fn(&str) -> Option<i64>) {
    let text = cell(row, column).trim();
    if text.is_empty() {
        return;
    }
    if let Some(value) = parse(text) {
        *field = Some(value);
    }
}

fn parse_int(text: &str) -> Option<i64> {
    text.parse().ok()
}

/// Thal scores come as `"3"` or `"Thal 3"`; only the last token counts.
pub fn parse_thal_score(text: &str) -> Option<i64> {
    text.split_whitespace().last()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    fn collection(ids: &[&str]) -> RecordCollection {
        let mut coll = RecordCollection::new();
        for id in ids {
            coll.insert(record(id));
        }
        coll
    }

    fn metadata(rows: Vec<Vec<&str>>) -> Table {
        let cols = MetadataColumns::default();
        let headers = [
            cols.id.as_str(),
            cols.sex.as_str(),
            cols.death_age.as_str(),
            cols.education_level.as_str(),
            cols.cognitive_status.as_str(),
            cols.symptom_onset_age.as_str(),
            cols.diagnosis_age.as_str(),
            cols.head_injury.as_str(),
            cols.neuropathology_score.as_str(),
        ];
        Table::from_records(&headers, rows)
    }

    #[test]
    fn thal_score_takes_last_token() {
        assert_eq!(parse_thal_score("Thal 2"), Some(2));
        assert_eq!(parse_thal_score("  4 "), Some(4));
        assert_eq!(parse_thal_score("Thal"), None);
        assert_eq!(parse_thal_score("Thal two"), None);
        assert_eq!(parse_thal_score(""), None);
    }

    #[test]
    fn all_fields_are_merged() {
        let mut coll = collection(&["A"]);
        let t = metadata(vec![vec![
            " A ", "Female", "88", "Bachelors", "Dementia", "79", "81", "N", "Thal 4",
        ]]);
        let warnings = merge_metadata(&mut coll, &t, &MetadataColumns::default()).unwrap();
        assert!(warnings.is_empty());

        let a = coll.get("A").unwrap();
        assert_eq!(a.sex.as_deref(), Some("Female"));
        assert_eq!(a.death_age, Some(88));
        assert_eq!(a.education_level.as_deref(), Some("Bachelors"));
        assert_eq!(a.cognitive_status.as_deref(), Some("Dementia"));
        assert_eq!(a.symptom_onset_age, Some(79));
        assert_eq!(a.diagnosis_age, Some(81));
        assert_eq!(a.head_injury.as_deref(), Some("N"));
        assert_eq!(a.neuropathology_score, Some(4));
    }

    #[test]
    fn blank_and_malformed_cells_stay_unset() {
        let mut coll = collection(&["A"]);
        let t = metadata(vec![vec!["A", "  ", "90+", "", "No dementia", "", "x", "", "Thal"]]);
        merge_metadata(&mut coll, &t, &MetadataColumns::default()).unwrap();

        let a = coll.get("A").unwrap();
        assert_eq!(a.sex, None);
        assert_eq!(a.death_age, None);
        assert_eq!(a.diagnosis_age, None);
        assert_eq!(a.neuropathology_score, None);
        assert_eq!(a.cognitive_status.as_deref(), Some("No dementia"));
    }

    #[test]
    fn unmatched_rows_warn_and_create_nothing() {
        let mut coll = collection(&["A"]);
        let t = metadata(vec![vec!["", "Male"], vec!["C", "Male"]]);
        let warnings = merge_metadata(&mut coll, &t, &MetadataColumns::default()).unwrap();
        assert_eq!(warnings, vec![Warning::LookupMiss { row: 1, id: "C".into() }]);
        assert_eq!(coll.len(), 1);
        assert!(!coll.contains("C"));
        assert_eq!(coll.get("A").unwrap().sex, None);
    }

    #[test]
    fn duplicate_ids_apply_only_the_last_row() {
        let mut coll = collection(&["A"]);
        let cols = MetadataColumns::default();
        let t = Table::from_records(
            &[cols.id.as_str(), cols.sex.as_str(), cols.neuropathology_score.as_str()],
            vec![vec!["A", "Female", "Thal 2"], vec![" A", "", "Thal 5"]],
        );
        let warnings = merge_metadata(&mut coll, &t, &cols).unwrap();
        assert!(warnings.is_empty());

        let a = coll.get("A").unwrap();
        assert_eq!(a.sex, None);
        assert_eq!(a.neuropathology_score, Some(5));
    }

    #[test]
    fn later_blank_cells_do_not_clear_values() {
        let mut coll = collection(&["A"]);
        let cols = MetadataColumns::default();
        merge_metadata(&mut coll, &metadata(vec![vec!["A", "Male", "70"]]), &cols).unwrap();
        merge_metadata(&mut coll, &metadata(vec![vec!["A", "", "", "HS"]]), &cols).unwrap();

        let a = coll.get("A").unwrap();
        assert_eq!(a.sex.as_deref(), Some("Male"));
        assert_eq!(a.death_age, Some(70));
        assert_eq!(a.education_level.as_deref(), Some("HS"));
    }

    #[test]
    fn missing_id_column_is_structural() {
        let mut coll = collection(&["A"]);
        let t = Table::from_records(&["Subject", "Sex"], vec![vec!["A", "Male"]]);
        let err = merge_metadata(&mut coll, &t, &MetadataColumns::default()).unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let mut coll = collection(&["A"]);
        let t = Table::from_records(&["Donor ID", "Thal"], vec![vec!["A", "Thal 1"]]);
        merge_metadata(&mut coll, &t, &MetadataColumns::default()).unwrap();
        assert_eq!(coll.get("A").unwrap().neuropathology_score, Some(1));
    }
}
