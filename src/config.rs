use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};

// ---------------------------------------------------------------------------
// Column headers
// ---------------------------------------------------------------------------

/// Exact header text of the biomarker (Luminex) table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomarkerColumns {
    pub id: String,
    pub amyloid_beta_40: String,
    pub amyloid_beta_42: String,
    pub total_tau: String,
    pub phospho_tau: String,
}

impl Default for BiomarkerColumns {
    fn default() -> Self {
        Self {
            id: "Donor ID".into(),
            amyloid_beta_40: "ABeta40 pg/ug".into(),
            amyloid_beta_42: "ABeta42 pg/ug".into(),
            total_tau: "tTAU pg/ug".into(),
            phospho_tau: "pTAU pg/ug".into(),
        }
    }
}

impl BiomarkerColumns {
    /// All headers the loader requires, identifier first.
    pub fn required(&self) -> [&str; 5] {
        [
            &self.id,
            &self.amyloid_beta_40,
            &self.amyloid_beta_42,
            &self.total_tau,
            &self.phospho_tau,
        ]
    }
}

/// Exact header text of the clinical metadata table.
/// Only `id` is required; every other column may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataColumns {
    pub id: String,
    pub sex: String,
    pub death_age: String,
    pub education_level: String,
    pub cognitive_status: String,
    pub symptom_onset_age: String,
    pub diagnosis_age: String,
    pub head_injury: String,
    pub neuropathology_score: String,
}

impl Default for MetadataColumns {
    fn default() -> Self {
        Self {
            id: "Donor ID".into(),
            sex: "Sex".into(),
            death_age: "Age at Death".into(),
            education_level: "Highest level of education".into(),
            cognitive_status: "Cognitive Status".into(),
            symptom_onset_age: "Age of onset cognitive symptoms".into(),
            diagnosis_age: "Age of Dementia diagnosis".into(),
            head_injury: "Known head injury".into(),
            neuropathology_score: "Thal".into(),
        }
    }
}

/// Header names for both input tables.
///
/// ```json
/// { "biomarker": { "id": "Subject" }, "metadata": { "id": "Subject", "neuropathology_score": "Thal phase" } }
/// ```
///
/// Missing keys fall back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub biomarker: BiomarkerColumns,
    pub metadata: MetadataColumns,
}

impl ColumnConfig {
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Read a column config from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| DataError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&text).map_err(|e| DataError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
