use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Fatal errors
// ---------------------------------------------------------------------------

/// Errors that abort a load, merge or query call.
///
/// Row-level problems are never reported here; they surface as [`Warning`]s.
#[derive(Debug, Error)]
pub enum DataError {
    /// The source table could not be opened or parsed.
    #[error("cannot read table {}: {message}", path.display())]
    Source { path: PathBuf, message: String },

    /// A required column header is absent from a table.
    #[error("{table} table is missing required column '{column}'")]
    MissingColumn { table: &'static str, column: String },

    /// A query was called with an attribute or value it does not support.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The column configuration file could not be read.
    #[error("invalid column config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl DataError {
    pub(crate) fn unreadable(path: impl Into<PathBuf>, err: impl fmt::Display) -> Self {
        DataError::Source {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// True for errors caused by the shape of the input tables.
    pub fn is_structural(&self) -> bool {
        matches!(self, DataError::Source { .. } | DataError::MissingColumn { .. })
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

// ---------------------------------------------------------------------------
// Recovered row problems
// ---------------------------------------------------------------------------

/// Why a biomarker row did not produce a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    EmptyIdentifier,
    MissingMeasurement { id: String, column: String },
    DuplicateIdentifier { id: String },
}

/// A non-fatal problem found while loading or merging.
///
/// `row` is the zero-based data row index (header excluded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    RowSkip { row: usize, reason: SkipReason },
    LookupMiss { row: usize, id: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::RowSkip { row, reason } => match reason {
                SkipReason::EmptyIdentifier => write!(f, "row {row}: empty identifier, skipped"),
                SkipReason::MissingMeasurement { id, column } => {
                    write!(f, "row {row}: {id} has no usable '{column}', skipped")
                }
                SkipReason::DuplicateIdentifier { id } => {
                    write!(f, "row {row}: duplicate identifier {id}, skipped")
                }
            },
            Warning::LookupMiss { row, id } => {
                write!(f, "row {row}: ID {id} not found in biomarker records")
            }
        }
    }
}
