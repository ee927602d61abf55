//! Merge a biomarker assay table with a clinical metadata table into one
//! record per donor, then group, sort, filter and summarise the result.
//!
//! ```no_run
//! use std::path::Path;
//! use neuro_cohort::config::ColumnConfig;
//! use neuro_cohort::data::{self, Criteria};
//!
//! # fn main() -> neuro_cohort::error::Result<()> {
//! let columns = ColumnConfig::default();
//! let luminex = data::read_table(Path::new("UpdatedLuminex.csv"))?;
//! let meta = data::read_table(Path::new("UpdatedMetaData.csv"))?;
//!
//! let mut records = data::load_records(&luminex, &columns.biomarker)?.records;
//! data::merge_metadata(&mut records, &meta, &columns.metadata)?;
//!
//! let criteria = Criteria::parse([("sex", Some("Male")), ("cog_stat", Some("Dementia"))])?;
//! let demented_men = data::filter(&records, &criteria)?;
//! println!("{}", demented_men.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod report;
pub mod stats;
