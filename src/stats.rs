use std::str::FromStr;

use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::statistics::Statistics;

use crate::data::{Groups, Record};
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Measures
// ---------------------------------------------------------------------------

/// Which biomarker a summary or comparison is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Measure {
    AmyloidBeta40,
    #[default]
    AmyloidBeta42,
    TotalTau,
    PhosphoTau,
}

impl Measure {
    pub const ALL: [Measure; 4] = [
        Measure::AmyloidBeta40,
        Measure::AmyloidBeta42,
        Measure::TotalTau,
        Measure::PhosphoTau,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Measure::AmyloidBeta40 => "ABeta40",
            Measure::AmyloidBeta42 => "ABeta42",
            Measure::TotalTau => "tTau",
            Measure::PhosphoTau => "pTau",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Measure::AmyloidBeta40 => "abeta40",
            Measure::AmyloidBeta42 => "abeta42",
            Measure::TotalTau => "ttau",
            Measure::PhosphoTau => "ptau",
        }
    }

    pub fn of(self, record: &Record) -> f64 {
        let b = record.biomarkers();
        match self {
            Measure::AmyloidBeta40 => b.amyloid_beta_40,
            Measure::AmyloidBeta42 => b.amyloid_beta_42,
            Measure::TotalTau => b.total_tau,
            Measure::PhosphoTau => b.phospho_tau,
        }
    }

    pub fn values<'a, I>(self, records: I) -> Vec<f64>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        records.into_iter().map(|r| self.of(r)).collect()
    }
}

impl FromStr for Measure {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Measure::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DataError::InvalidArgument(format!("unknown measure '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().mean())
}

/// Sample standard deviation (n − 1 denominator).
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    Some(values.iter().std_dev())
}

fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    Some(values.iter().variance())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub n: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
}

impl Summary {
    pub fn of(values: &[f64]) -> Self {
        Self {
            n: values.len(),
            mean: mean(values),
            std_dev: sample_std_dev(values),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub label: String,
    pub summary: Summary,
}

/// Summarise `measure` for every group, in group-label order.
pub fn summarize_groups(groups: &Groups<'_>, measure: Measure) -> Vec<GroupSummary> {
    groups
        .iter()
        .map(|(label, members)| GroupSummary {
            label: label.clone(),
            summary: Summary::of(&measure.values(members.iter().copied())),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Two-sample comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTest {
    pub statistic: f64,
    /// Two-sided.
    pub p_value: f64,
    pub degrees_of_freedom: f64,
}

/// Student's independent two-sample t-test, equal variances assumed.
///
/// Returns `None` when either sample has fewer than two observations or both
/// samples are constant, where the statistic is undefined.
pub fn two_sample_t_test(a: &[f64], b: &[f64]) -> Option<TTest> {
    let (n1, n2) = (a.len(), b.len());
    let var1 = sample_variance(a)?;
    let var2 = sample_variance(b)?;
    let df = (n1 + n2 - 2) as f64;

    let pooled = ((n1 - 1) as f64 * var1 + (n2 - 1) as f64 * var2) / df;
    let se = (pooled * (1.0 / n1 as f64 + 1.0 / n2 as f64)).sqrt();
    if !(se > 0.0) {
        return None;
    }

    let statistic = (mean(a)? - mean(b)?) / se;
    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    let p_value = (2.0 * (1.0 - dist.cdf(statistic.abs()))).clamp(0.0, 1.0);
    Some(TTest {
        statistic,
        p_value,
        degrees_of_freedom: df,
    })
}
