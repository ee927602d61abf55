/// Data layer: tables, records, merging and queries.
///
/// Architecture:
/// ```text
///  biomarker table          metadata table
///  (.csv/.tsv/.json/.parquet)
///        │                        │
///        ▼                        ▼
///   ┌──────────┐             ┌──────────┐
///   │  source   │  file → Table (header → cell text rows)
///   └──────────┘             └──────────┘
///        │                        │
///        ▼                        │
///   ┌──────────┐                  │
///   │  loader   │  Table → RecordCollection (one Record per donor)
///   └──────────┘                  │
///        │                        ▼
///        │                  ┌──────────┐
///        └────────────────► │  merge    │  enrich Records in place by donor ID
///                           └──────────┘
///                                 │
///                                 ▼
///                ┌──────────┐          ┌──────────┐
///                │  group    │          │  filter   │  read-only views
///                └──────────┘          └──────────┘
/// ```

pub mod filter;
pub mod group;
pub mod loader;
pub mod merge;
pub mod model;
pub mod source;

pub use filter::{dementia_or_unknown, filter, Criteria};
pub use group::{
    cmp_death_age_unset_first, cmp_neuropathology_unset_last, group_by, group_by_education,
    sort_records, sort_within_group_by_neuropathology, GroupBy, Groups, SortKey, UNKNOWN_GROUP,
};
pub use loader::{load_records, Loaded};
pub use merge::merge_metadata;
pub use model::{Attribute, AttributeValue, Biomarkers, Record, RecordCollection, ValueKind};
pub use source::{read_table, Row, Table};
