use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use crate::error::{DataError, Result};

// ---------------------------------------------------------------------------
// Table – header-keyed rows of cell text
// ---------------------------------------------------------------------------

/// One source row: column header → cell text (possibly empty).
pub type Row = BTreeMap<String, String>;

/// A parsed delimited table: headers in file order plus rows in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self { headers, rows }
    }

    /// Build a table from header names and positional cells; short rows are
    /// padded with empty cells.
    pub fn from_records<H, R, C>(headers: &[H], records: R) -> Self
    where
        H: AsRef<str>,
        R: IntoIterator<Item = Vec<C>>,
        C: Into<String>,
    {
        let headers: Vec<String> = headers.iter().map(|h| h.as_ref().to_string()).collect();
        let rows = records
            .into_iter()
            .map(|cells| {
                let mut cells = cells.into_iter().map(Into::into);
                headers
                    .iter()
                    .map(|h| (h.clone(), cells.next().unwrap_or_default()))
                    .collect()
            })
            .collect();
        Self { headers, rows }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Cell text for `column`, empty when the row has no such cell.
pub fn cell<'a>(row: &'a Row, column: &str) -> &'a str {
    row.get(column).map(String::as_str).unwrap_or("")
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`            – comma-separated, header row first
/// * `.tsv` / `.txt`   – tab-separated, header row first
/// * `.json`           – `[{ "Donor ID": "...", "Sex": "...", ... }, ...]`
/// * `.parquet` / `.pq` – any column types, rendered as text
pub fn read_table(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => read_delimited(path, b',')?,
        "tsv" | "txt" => read_delimited(path, b'\t')?,
        "json" => read_json(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        other => {
            return Err(DataError::unreadable(
                path,
                format!("unsupported file extension: .{other}"),
            ))
        }
    };
    log::debug!(
        "Read {} rows with columns {:?} from {}",
        table.len(),
        table.headers,
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

fn read_delimited(path: &Path, delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .map_err(|e| DataError::unreadable(path, e))?;

    let mut headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataError::unreadable(path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if let Some(first) = headers.first_mut() {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| DataError::unreadable(path, format!("row {row_no}: {e}")))?;
        let row: Row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(row);
    }

    Ok(Table { headers, rows })
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`).  Headers are the
/// union of keys in order of first appearance; nulls read as empty cells.
fn read_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::unreadable(path, e))?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|e| DataError::unreadable(path, e))?;

    let records = root
        .as_array()
        .ok_or_else(|| DataError::unreadable(path, "expected top-level JSON array"))?;

    let mut headers: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DataError::unreadable(path, format!("row {i} is not a JSON object")))?;

        let mut row = Row::new();
        for (key, val) in obj {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
            row.insert(key.clone(), json_to_text(val));
        }
        rows.push(row);
    }

    Ok(Table { headers, rows })
}

fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

fn read_parquet(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|e| DataError::unreadable(path, e))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| DataError::unreadable(path, e))?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().map_err(|e| DataError::unreadable(path, e))?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|e| DataError::unreadable(path, e))?;
        for row_idx in 0..batch.num_rows() {
            let mut row = Row::new();
            for (col_idx, name) in headers.iter().enumerate() {
                let column = batch.column(col_idx);
                let text = if column.is_null(row_idx) {
                    String::new()
                } else {
                    array_value_to_string(column.as_ref(), row_idx)
                        .map_err(|e| DataError::unreadable(path, e))?
                };
                row.insert(name.clone(), text);
            }
            rows.push(row);
        }
    }

    Ok(Table { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn temp_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn csv_short_rows_are_padded() {
        let file = temp_file(".csv", "\u{feff}Donor ID,Sex,Thal\nA,Female,Thal 2\nB,Male\n");
        let table = read_table(file.path()).unwrap();
        assert_eq!(table.headers, vec!["Donor ID", "Sex", "Thal"]);
        assert_eq!(table.len(), 2);
        assert_eq!(cell(&table.rows[0], "Thal"), "Thal 2");
        assert_eq!(cell(&table.rows[1], "Thal"), "");
        assert_eq!(cell(&table.rows[1], "Nope"), "");
    }

    #[test]
    fn tsv_uses_tab_delimiter() {
        let file = temp_file(".tsv", "Donor ID\tSex\nA\tFemale, retired\n");
        let table = read_table(file.path()).unwrap();
        assert_eq!(cell(&table.rows[0], "Sex"), "Female, retired");
    }

    #[test]
    fn json_records_become_text_cells() {
        let file = temp_file(
            ".json",
            r#"[{"Donor ID": "A", "Age at Death": 88, "Sex": null}, {"Donor ID": "B", "Thal": "Thal 3"}]"#,
        );
        let table = read_table(file.path()).unwrap();
        assert!(table.has_column("Thal"));
        assert_eq!(cell(&table.rows[0], "Age at Death"), "88");
        assert_eq!(cell(&table.rows[0], "Sex"), "");
        assert_eq!(cell(&table.rows[1], "Thal"), "Thal 3");
    }

    #[test]
    fn missing_file_and_bad_extension_are_structural() {
        let err = read_table(Path::new("/nonexistent/luminex.csv")).unwrap_err();
        assert!(err.is_structural());

        let file = temp_file(".xlsx", "whatever");
        let err = read_table(file.path()).unwrap_err();
        assert!(matches!(err, DataError::Source { .. }));
    }

    #[test]
    fn json_must_be_an_array() {
        let file = temp_file(".json", r#"{"Donor ID": "A"}"#);
        assert!(read_table(file.path()).unwrap_err().is_structural());
    }
}
