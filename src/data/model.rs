use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

// ---------------------------------------------------------------------------
// Biomarkers – the four required assay values
// ---------------------------------------------------------------------------

/// Luminex assay values, in pg/µg of tissue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biomarkers {
    pub amyloid_beta_40: f64,
    pub amyloid_beta_42: f64,
    pub total_tau: f64,
    pub phospho_tau: f64,
}

// ---------------------------------------------------------------------------
// Record – one donor's merged data
// ---------------------------------------------------------------------------

/// One donor: biomarkers from the assay table plus optional clinical
/// metadata filled in by the merger.
///
/// `id` and `biomarkers` are fixed at creation. Everything else starts as
/// `None` and is only ever written with a non-empty metadata value.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: String,
    biomarkers: Biomarkers,
    pub sex: Option<String>,
    pub death_age: Option<i64>,
    pub education_level: Option<String>,
    pub cognitive_status: Option<String>,
    pub symptom_onset_age: Option<i64>,
    pub diagnosis_age: Option<i64>,
    pub head_injury: Option<String>,
    /// Thal amyloid phase.
    pub neuropathology_score: Option<i64>,
}

impl Record {
    pub(crate) fn new(id: impl Into<String>, biomarkers: Biomarkers) -> Self {
        Self {
            id: id.into(),
            biomarkers,
            sex: None,
            death_age: None,
            education_level: None,
            cognitive_status: None,
            symptom_onset_age: None,
            diagnosis_age: None,
            head_injury: None,
            neuropathology_score: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn biomarkers(&self) -> Biomarkers {
        self.biomarkers
    }

    /// Current value of a filterable attribute, `None` when unset.
    pub fn value(&self, attribute: Attribute) -> Option<AttributeValue> {
        let text = |v: &Option<String>| v.as_ref().map(|s| AttributeValue::Text(s.clone()));
        let int = |v: Option<i64>| v.map(AttributeValue::Integer);
        match attribute {
            Attribute::Id => Some(AttributeValue::Text(self.id.clone())),
            Attribute::Sex => text(&self.sex),
            Attribute::DeathAge => int(self.death_age),
            Attribute::EducationLevel => text(&self.education_level),
            Attribute::CognitiveStatus => text(&self.cognitive_status),
            Attribute::SymptomOnsetAge => int(self.symptom_onset_age),
            Attribute::DiagnosisAge => int(self.diagnosis_age),
            Attribute::HeadInjury => text(&self.head_injury),
            Attribute::NeuropathologyScore => int(self.neuropathology_score),
        }
    }

    /// Equality test without cloning the field.
    pub fn matches(&self, attribute: Attribute, expected: &AttributeValue) -> bool {
        let text = |v: &Option<String>| {
            matches!(expected, AttributeValue::Text(e) if v.as_deref() == Some(e.as_str()))
        };
        let int = |v: Option<i64>| matches!(expected, AttributeValue::Integer(e) if v == Some(*e));
        match attribute {
            Attribute::Id => matches!(expected, AttributeValue::Text(e) if *e == self.id),
            Attribute::Sex => text(&self.sex),
            Attribute::DeathAge => int(self.death_age),
            Attribute::EducationLevel => text(&self.education_level),
            Attribute::CognitiveStatus => text(&self.cognitive_status),
            Attribute::SymptomOnsetAge => int(self.symptom_onset_age),
            Attribute::DiagnosisAge => int(self.diagnosis_age),
            Attribute::HeadInjury => text(&self.head_injury),
            Attribute::NeuropathologyScore => int(self.neuropathology_score),
        }
    }
}

fn opt<T: fmt::Display>(v: &Option<T>) -> String {
    match v {
        Some(v) => v.to_string(),
        None => "NA".to_string(),
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.biomarkers;
        write!(
            f,
            "{} | sex: {} | ABeta40 {} | ABeta42 {} | tTau {} | pTau {} | Death Age {} | Thal Score {}",
            self.id,
            opt(&self.sex),
            b.amyloid_beta_40,
            b.amyloid_beta_42,
            b.total_tau,
            b.phospho_tau,
            opt(&self.death_age),
            opt(&self.neuropathology_score),
        )
    }
}

// ---------------------------------------------------------------------------
// Attribute – the closed set of queryable record fields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    Id,
    Sex,
    DeathAge,
    EducationLevel,
    CognitiveStatus,
    SymptomOnsetAge,
    DiagnosisAge,
    HeadInjury,
    NeuropathologyScore,
}

/// Whether an attribute holds text or an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Integer,
}

impl Attribute {
    pub const ALL: [Attribute; 9] = [
        Attribute::Id,
        Attribute::Sex,
        Attribute::DeathAge,
        Attribute::EducationLevel,
        Attribute::CognitiveStatus,
        Attribute::SymptomOnsetAge,
        Attribute::DiagnosisAge,
        Attribute::HeadInjury,
        Attribute::NeuropathologyScore,
    ];

    /// Canonical snake_case name, accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Id => "id",
            Attribute::Sex => "sex",
            Attribute::DeathAge => "death_age",
            Attribute::EducationLevel => "education_level",
            Attribute::CognitiveStatus => "cognitive_status",
            Attribute::SymptomOnsetAge => "symptom_onset_age",
            Attribute::DiagnosisAge => "diagnosis_age",
            Attribute::HeadInjury => "head_injury",
            Attribute::NeuropathologyScore => "neuropathology_score",
        }
    }

    /// Human-readable label for UI headings.
    pub fn label(self) -> &'static str {
        match self {
            Attribute::Id => "Donor ID",
            Attribute::Sex => "Sex",
            Attribute::DeathAge => "Age at death",
            Attribute::EducationLevel => "Education",
            Attribute::CognitiveStatus => "Cognitive status",
            Attribute::SymptomOnsetAge => "Age at symptom onset",
            Attribute::DiagnosisAge => "Age at diagnosis",
            Attribute::HeadInjury => "Head injury",
            Attribute::NeuropathologyScore => "Thal score",
        }
    }

    pub fn kind(self) -> ValueKind {
        match self {
            Attribute::DeathAge
            | Attribute::SymptomOnsetAge
            | Attribute::DiagnosisAge
            | Attribute::NeuropathologyScore => ValueKind::Integer,
            _ => ValueKind::Text,
        }
    }

    /// Convert query text into a value of this attribute's kind.
    pub fn parse_value(self, text: &str) -> Result<AttributeValue, DataError> {
        match self.kind() {
            ValueKind::Text => Ok(AttributeValue::Text(text.to_string())),
            ValueKind::Integer => text
                .trim()
                .parse::<i64>()
                .map(AttributeValue::Integer)
                .map_err(|_| {
                    DataError::InvalidArgument(format!(
                        "'{text}' is not an integer value for {}",
                        self.name()
                    ))
                }),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let attribute = match s.trim() {
            "id" | "donor_id" => Attribute::Id,
            "sex" => Attribute::Sex,
            "death_age" => Attribute::DeathAge,
            "education_level" | "ed_lvl" => Attribute::EducationLevel,
            "cognitive_status" | "cog_stat" => Attribute::CognitiveStatus,
            "symptom_onset_age" | "age_symp_on" => Attribute::SymptomOnsetAge,
            "diagnosis_age" | "age_diag" => Attribute::DiagnosisAge,
            "head_injury" | "head_inj" => Attribute::HeadInjury,
            "neuropathology_score" | "thal_score" | "thal" => Attribute::NeuropathologyScore,
            other => {
                return Err(DataError::InvalidArgument(format!(
                    "unknown filter attribute '{other}'"
                )))
            }
        };
        Ok(attribute)
    }
}

// ---------------------------------------------------------------------------
// AttributeValue – a concrete value of one attribute
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttributeValue {
    Text(String),
    Integer(i64),
}

impl AttributeValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            AttributeValue::Text(_) => ValueKind::Text,
            AttributeValue::Integer(_) => ValueKind::Integer,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(s) => write!(f, "{s}"),
            AttributeValue::Integer(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        AttributeValue::Integer(i)
    }
}

// ---------------------------------------------------------------------------
// RecordCollection – the caller-owned set of merged records
// ---------------------------------------------------------------------------

/// All records of one load, in insertion order, with an id index.
#[derive(Debug, Clone, Default)]
pub struct RecordCollection {
    records: Vec<Record>,
    index: HashMap<String, usize>,
}

impl RecordCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    /// Insertion position of the record with `id`.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
    }

    /// Sorted set of values currently present for `attribute`.
    pub fn distinct_values(&self, attribute: Attribute) -> BTreeSet<AttributeValue> {
        self.records
            .iter()
            .filter_map(|r| r.value(attribute))
            .collect()
    }

    /// Add a record unless its id is already present.
    pub(crate) fn insert(&mut self, record: Record) -> bool {
        if self.index.contains_key(record.id()) {
            return false;
        }
        self.index.insert(record.id.clone(), self.records.len());
        self.records.push(record);
        true
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Record> {
        let i = *self.index.get(id)?;
        self.records.get_mut(i)
    }
}

impl<'a> IntoIterator for &'a RecordCollection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(id: &str) -> Record {
        Record::new(
            id,
            Biomarkers {
                amyloid_beta_40: 1.0,
                amyloid_beta_42: 2.0,
                total_tau: 3.0,
                phospho_tau: 4.0,
            },
        )
    }

    #[test]
    fn insert_rejects_duplicate_ids() {
        let mut coll = RecordCollection::new();
        assert!(coll.insert(record("A")));
        assert!(!coll.insert(record("A")));
        assert_eq!(coll.len(), 1);
        assert!(coll.contains("A"));
    }

    #[test]
    fn attribute_aliases_and_unknown_names() {
        assert_eq!("cog_stat".parse::<Attribute>().unwrap(), Attribute::CognitiveStatus);
        assert_eq!("thal".parse::<Attribute>().unwrap(), Attribute::NeuropathologyScore);
        for a in Attribute::ALL {
            assert_eq!(a.name().parse::<Attribute>().unwrap(), a);
        }
        let err = "shoe_size".parse::<Attribute>().unwrap_err();
        assert!(matches!(err, DataError::InvalidArgument(_)));
    }

    #[test]
    fn integer_attribute_rejects_text_value() {
        assert_eq!(
            Attribute::DeathAge.parse_value(" 81 ").unwrap(),
            AttributeValue::Integer(81)
        );
        assert!(Attribute::DeathAge.parse_value("90+").is_err());
        assert_eq!(
            Attribute::Sex.parse_value("Male").unwrap(),
            AttributeValue::from("Male")
        );
    }

    #[test]
    fn distinct_values_skip_unset() {
        let mut coll = RecordCollection::new();
        let mut a = record("A");
        a.sex = Some("Male".into());
        let mut b = record("B");
        b.sex = Some("Female".into());
        coll.insert(a);
        coll.insert(b);
        coll.insert(record("C"));
        let vals: Vec<_> = coll.distinct_values(Attribute::Sex).into_iter().collect();
        assert_eq!(vals, vec![AttributeValue::from("Female"), AttributeValue::from("Male")]);
    }

    #[test]
    fn display_marks_unset_fields() {
        let mut r = record("H21.33.001");
        r.neuropathology_score = Some(3);
        let line = r.to_string();
        assert!(line.starts_with("H21.33.001 | sex: NA | ABeta40 1"));
        assert!(line.ends_with("Death Age NA | Thal Score 3"));
    }
}
