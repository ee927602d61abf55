use crate::config::BiomarkerColumns;
use crate::error::{DataError, Result, SkipReason, Warning};

use super::model::{Biomarkers, Record, RecordCollection};
use super::source::{cell, Row, Table};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Result of a biomarker load: the new records plus the rows that were dropped.
#[derive(Debug, Clone, Default)]
pub struct Loaded {
    pub records: RecordCollection,
    pub warnings: Vec<Warning>,
}

/// Build one [`Record`] per valid row of the biomarker table.
///
/// A row is kept only when its trimmed identifier is non-empty, not seen
/// before in this table, and all four measurements parse as finite floats.
/// Every other row is dropped with a [`Warning::RowSkip`].
pub fn load_records(table: &Table, columns: &BiomarkerColumns) -> Result<Loaded> {
    for column in columns.required() {
        if !table.has_column(column) {
            return Err(DataError::MissingColumn {
                table: "biomarker",
                column: column.to_string(),
            });
        }
    }

    let mut loaded = Loaded::default();
    for (row_no, row) in table.rows.iter().enumerate() {
        match record_from_row(row, columns) {
            Ok(record) => {
                let id = record.id().to_string();
                if !loaded.records.insert(record) {
                    skip(&mut loaded.warnings, row_no, SkipReason::DuplicateIdentifier { id });
                }
            }
            Err(reason) => skip(&mut loaded.warnings, row_no, reason),
        }
    }

    log::info!(
        "Loaded {} records from {} biomarker rows ({} skipped)",
        loaded.records.len(),
        table.len(),
        loaded.warnings.len()
    );
    Ok(loaded)
}

impl RecordCollection {
    /// Replace the whole collection with a fresh load of `table`.
    ///
    /// On a structural error the previous contents are left in place.
    pub fn reload(
        &mut self,
        table: &Table,
        columns: &BiomarkerColumns,
    ) -> Result<Vec<Warning>> {
        let loaded = load_records(table, columns)?;
        *self = loaded.records;
        Ok(loaded.warnings)
    }
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

fn skip(warnings: &mut Vec<Warning>, row: usize, reason: SkipReason) {
    let warning = Warning::RowSkip { row, reason };
    log::warn!("{warning}");
    warnings.push(warning);
}

fn record_from_row(
    row: &Row,
    columns: &BiomarkerColumns,
) -> std::result::Result<Record, SkipReason> {
    let id = cell(row, &columns.id).trim();
    if id.is_empty() {
        return Err(SkipReason::EmptyIdentifier);
    }

    let measure = |column: &String| {
        parse_measurement(cell(row, column)).ok_or_else(|| SkipReason::MissingMeasurement {
            id: id.to_string(),
            column: column.clone(),
        })
    };

    let biomarkers = Biomarkers {
        amyloid_beta_40: measure(&columns.amyloid_beta_40)?,
        amyloid_beta_42: measure(&columns.amyloid_beta_42)?,
        total_tau: measure(&columns.total_tau)?,
        phospho_tau: measure(&columns.phospho_tau)?,
    };
    Ok(Record::new(id, biomarkers))
}

/// Blank, unparseable and non-finite text all count as missing.
fn parse_measurement(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
