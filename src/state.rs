use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use neuro_cohort::config::ColumnConfig;
use neuro_cohort::data::{
    self, Attribute, AttributeValue, Criteria, GroupBy, Groups, Record, RecordCollection, SortKey,
};
use neuro_cohort::error::Warning;
use neuro_cohort::stats::Measure;

use crate::color::ColorMap;

/// What the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Chart,
    Records,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Header names expected in the input tables.
    pub columns: ColumnConfig,

    /// Merged records (None until a biomarker table is loaded).
    pub records: Option<RecordCollection>,

    pub biomarker_path: Option<PathBuf>,
    pub metadata_path: Option<PathBuf>,

    /// Rows dropped by the last load and merge.
    pub warnings: Vec<Warning>,

    /// Active equality filters.
    pub criteria: Criteria,

    /// Keep only donors with dementia or no recorded status.
    pub dementia_only: bool,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    pub group_by: GroupBy,
    pub measure: Measure,
    pub sort_key: SortKey,
    pub view: View,

    /// Colours of the current groups.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load (or reload) the biomarker table, then re-apply the metadata
    /// table if one was loaded before.
    pub fn load_biomarkers(&mut self, path: &Path) -> Result<()> {
        let table = data::read_table(path).context("reading biomarker table")?;
        let mut warnings = match self.records.as_mut() {
            Some(records) => records.reload(&table, &self.columns.biomarker)?,
            None => {
                let loaded = data::load_records(&table, &self.columns.biomarker)?;
                self.records = Some(loaded.records);
                loaded.warnings
            }
        };
        self.biomarker_path = Some(path.to_path_buf());

        // The new records are installed even if the re-merge fails, so the
        // view must be rebuilt against them before the error is returned.
        let merged = match self.metadata_path.clone() {
            Some(meta_path) => self.merge_from(&meta_path),
            None => Ok(Vec::new()),
        };
        let result = merged.map(|misses| warnings.extend(misses));
        self.warnings = warnings;
        self.refilter();
        result
    }

    /// Merge a metadata table into the loaded records.
    pub fn load_metadata(&mut self, path: &Path) -> Result<()> {
        if self.records.is_none() {
            bail!("load a biomarker table before the metadata table");
        }
        let misses = self.merge_from(path)?;
        self.metadata_path = Some(path.to_path_buf());
        self.warnings.retain(|w| !matches!(w, Warning::LookupMiss { .. }));
        self.warnings.extend(misses);
        self.refilter();
        Ok(())
    }

    /// Switch header names and reload whatever is already open.
    pub fn load_columns(&mut self, path: &Path) -> Result<()> {
        self.columns = ColumnConfig::from_json_file(path)?;
        self.reload()
    }

    /// Re-read both tables from disk.
    pub fn reload(&mut self) -> Result<()> {
        match self.biomarker_path.clone() {
            Some(path) => self.load_biomarkers(&path),
            None => Ok(()),
        }
    }

    fn merge_from(&mut self, path: &Path) -> Result<Vec<Warning>> {
        let table = data::read_table(path).context("reading metadata table")?;
        let Some(records) = self.records.as_mut() else {
            return Ok(Vec::new());
        };
        Ok(data::merge_metadata(records, &table, &self.columns.metadata)?)
    }

    /// Recompute `visible_indices` after a data or filter change.
    pub fn refilter(&mut self) {
        let Some(records) = &self.records else {
            self.visible_indices.clear();
            return;
        };
        let mut visible = match data::filter(records, &self.criteria) {
            Ok(v) => v,
            Err(e) => {
                log::error!("Filter rejected: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.visible_indices.clear();
                return;
            }
        };
        if self.dementia_only {
            visible = data::dementia_or_unknown(visible);
        }
        self.visible_indices = visible
            .iter()
            .filter_map(|r| records.index_of(r.id()))
            .collect();
        self.rebuild_color_map();
    }

    /// Set or clear (`None`) the filter value for one attribute.
    pub fn set_constraint(&mut self, attribute: Attribute, value: Option<AttributeValue>) {
        match value {
            Some(v) => self.criteria.constrain(attribute, v),
            None => self.criteria.unconstrain(attribute),
        }
        self.refilter();
    }

    pub fn clear_filters(&mut self) {
        self.criteria = Criteria::new();
        self.dementia_only = false;
        self.refilter();
    }

    pub fn set_group_by(&mut self, group_by: GroupBy) {
        self.group_by = group_by;
        self.rebuild_color_map();
    }

    pub fn visible_records(&self) -> Vec<&Record> {
        let Some(records) = &self.records else {
            return Vec::new();
        };
        let all = records.records();
        self.visible_indices
            .iter()
            .filter_map(|&i| all.get(i))
            .collect()
    }

    /// Visible records grouped by the current `group_by`, each group sorted
    /// by Thal score.
    pub fn groups(&self) -> Groups<'_> {
        let mut groups = data::group_by(self.visible_records(), self.group_by);
        data::sort_within_group_by_neuropathology(&mut groups);
        groups
    }

    fn rebuild_color_map(&mut self) {
        let labels: Vec<String> = self.groups().into_keys().collect();
        self.color_map = ColorMap::new(labels.iter().map(String::as_str));
    }
}
