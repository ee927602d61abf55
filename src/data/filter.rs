use std::collections::BTreeMap;

use crate::error::{DataError, Result};

use super::model::{Attribute, AttributeValue, Record};

// ---------------------------------------------------------------------------
// Criteria: which value each attribute must equal
// ---------------------------------------------------------------------------

/// Equality constraints keyed by attribute.
/// An attribute absent from the map is unconstrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    constraints: BTreeMap<Attribute, AttributeValue>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `(attribute name, value)` pairs; a `None` value leaves the
    /// attribute unconstrained. Unknown names and non-integer values for
    /// integer attributes are rejected.
    pub fn parse<'s, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'s str, Option<&'s str>)>,
    {
        let mut criteria = Criteria::new();
        for (name, value) in pairs {
            let attribute: Attribute = name.parse()?;
            match value {
                Some(text) => criteria.constrain(attribute, attribute.parse_value(text)?),
                None => criteria.unconstrain(attribute),
            }
        }
        Ok(criteria)
    }

    pub fn constrain(&mut self, attribute: Attribute, value: impl Into<AttributeValue>) {
        self.constraints.insert(attribute, value.into());
    }

    pub fn unconstrain(&mut self, attribute: Attribute) {
        self.constraints.remove(&attribute);
    }

    pub fn get(&self, attribute: Attribute) -> Option<&AttributeValue> {
        self.constraints.get(&attribute)
    }

    pub fn is_unconstrained(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &AttributeValue)> {
        self.constraints.iter().map(|(a, v)| (*a, v))
    }

    fn validate(&self) -> Result<()> {
        for (attribute, value) in self.iter() {
            if value.kind() != attribute.kind() {
                return Err(DataError::InvalidArgument(format!(
                    "{attribute} expects a {:?} value, got '{value}'",
                    attribute.kind()
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return the records matching every constraint, in input order.
///
/// A record passes when, for each constrained attribute, its field is set and
/// exactly equal to the constraint value. Constraints are validated before
/// any record is looked at.
pub fn filter<'a, I>(records: I, criteria: &Criteria) -> Result<Vec<&'a Record>>
where
    I: IntoIterator<Item = &'a Record>,
{
    criteria.validate()?;
    Ok(records
        .into_iter()
        .filter(|record| criteria.iter().all(|(attr, value)| record.matches(attr, value)))
        .collect())
}

/// Records with a dementia diagnosis or no recorded cognitive status.
pub fn dementia_or_unknown<'a, I>(records: I) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter(|r| match r.cognitive_status.as_deref() {
            None => true,
            Some(status) => status.trim().eq_ignore_ascii_case("dementia"),
        })
        .collect()
}
