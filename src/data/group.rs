use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

use super::model::Record;

/// Group key used for records whose grouping field is unset.
pub const UNKNOWN_GROUP: &str = "Unknown";

/// Group label → member records, labels in sorted order.
pub type Groups<'a> = BTreeMap<String, Vec<&'a Record>>;

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Categorical fields records can be partitioned by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupBy {
    Sex,
    #[default]
    EducationLevel,
    CognitiveStatus,
    HeadInjury,
}

impl GroupBy {
    pub const ALL: [GroupBy; 4] = [
        GroupBy::Sex,
        GroupBy::EducationLevel,
        GroupBy::CognitiveStatus,
        GroupBy::HeadInjury,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GroupBy::Sex => "Sex",
            GroupBy::EducationLevel => "Education",
            GroupBy::CognitiveStatus => "Cognitive status",
            GroupBy::HeadInjury => "Head injury",
        }
    }

    fn key<'r>(self, record: &'r Record) -> Option<&'r str> {
        match self {
            GroupBy::Sex => record.sex.as_deref(),
            GroupBy::EducationLevel => record.education_level.as_deref(),
            GroupBy::CognitiveStatus => record.cognitive_status.as_deref(),
            GroupBy::HeadInjury => record.head_injury.as_deref(),
        }
    }
}

/// Partition records by a categorical field; unset values go to
/// [`UNKNOWN_GROUP`]. Members keep their input order.
pub fn group_by<'a, I>(records: I, by: GroupBy) -> Groups<'a>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut groups = Groups::new();
    for record in records {
        let key = by.key(record).unwrap_or(UNKNOWN_GROUP);
        groups.entry(key.to_string()).or_default().push(record);
    }
    groups
}

pub fn group_by_education<'a, I>(records: I) -> Groups<'a>
where
    I: IntoIterator<Item = &'a Record>,
{
    group_by(records, GroupBy::EducationLevel)
}

// ---------------------------------------------------------------------------
// Comparators
// ---------------------------------------------------------------------------

/// Ascending Thal score, unset scores after every set score.
pub fn cmp_neuropathology_unset_last(a: &Record, b: &Record) -> Ordering {
    match (a.neuropathology_score, b.neuropathology_score) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Ascending age at death, unset ages before every set age.
pub fn cmp_death_age_unset_first(a: &Record, b: &Record) -> Ordering {
    // Option's derived order already places None first.
    a.death_age.cmp(&b.death_age)
}

/// Stable sort of every group by Thal score, unset last.
pub fn sort_within_group_by_neuropathology(groups: &mut Groups<'_>) {
    for members in groups.values_mut() {
        members.sort_by(|a, b| cmp_neuropathology_unset_last(a, b));
    }
}

// ---------------------------------------------------------------------------
// Whole-collection sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Id,
    AmyloidBeta40,
    AmyloidBeta42,
    TotalTau,
    PhosphoTau,
    DeathAge,
    NeuropathologyScore,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::Id,
        SortKey::AmyloidBeta40,
        SortKey::AmyloidBeta42,
        SortKey::TotalTau,
        SortKey::PhosphoTau,
        SortKey::DeathAge,
        SortKey::NeuropathologyScore,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::AmyloidBeta40 => "abeta40",
            SortKey::AmyloidBeta42 => "abeta42",
            SortKey::TotalTau => "ttau",
            SortKey::PhosphoTau => "ptau",
            SortKey::DeathAge => "death_age",
            SortKey::NeuropathologyScore => "thal",
        }
    }

    pub fn compare(self, a: &Record, b: &Record) -> Ordering {
        let (x, y) = (a.biomarkers(), b.biomarkers());
        match self {
            SortKey::Id => a.id().cmp(b.id()),
            SortKey::AmyloidBeta40 => x.amyloid_beta_40.total_cmp(&y.amyloid_beta_40),
            SortKey::AmyloidBeta42 => x.amyloid_beta_42.total_cmp(&y.amyloid_beta_42),
            SortKey::TotalTau => x.total_tau.total_cmp(&y.total_tau),
            SortKey::PhosphoTau => x.phospho_tau.total_cmp(&y.phospho_tau),
            SortKey::DeathAge => cmp_death_age_unset_first(a, b),
            SortKey::NeuropathologyScore => cmp_neuropathology_unset_last(a, b),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortKey {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DataError::InvalidArgument(format!("unknown sort key '{s}'")))
    }
}

/// Stable ascending sort by `key`.
pub fn sort_records(records: &mut [&Record], key: SortKey) {
    records.sort_by(|a, b| key.compare(a, b));
}
