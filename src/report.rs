//! Plain-text rendering of records, groups and comparisons for the terminal.

use std::fmt::{self, Write as _};

use crate::data::{filter, Criteria, Groups, Record};
use crate::error::Result;
use crate::stats::{two_sample_t_test, GroupSummary, Measure, Summary};

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.3}")).unwrap_or_else(|| "n/a".to_string())
}

/// One line per record.
pub fn record_listing<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut out = String::new();
    for record in records {
        let _ = writeln!(out, "{record}");
    }
    out
}

/// Group headings followed by their members and a blank line.
pub fn grouped_listing(groups: &Groups<'_>) -> String {
    let mut out = String::new();
    for (label, members) in groups {
        let _ = writeln!(out, "{label}");
        out.push_str(&record_listing(members.iter().copied()));
        out.push('\n');
    }
    out
}

pub fn group_summary_table(summaries: &[GroupSummary], measure: Measure) -> String {
    let width = summaries
        .iter()
        .map(|g| g.label.len())
        .max()
        .unwrap_or(0)
        .max("group".len());
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<width$}  {:>5}  {:>12}  {:>12}",
        "group",
        "n",
        format!("mean {}", measure.label()),
        "stdev"
    );
    for g in summaries {
        let _ = writeln!(
            out,
            "{:<width$}  {:>5}  {:>12}  {:>12}",
            g.label,
            g.summary.n,
            fmt_opt(g.summary.mean),
            fmt_opt(g.summary.std_dev)
        );
    }
    out
}

// ---------------------------------------------------------------------------
// Sex × cognitive status counts
// ---------------------------------------------------------------------------

/// Donor counts for each combination of sex and dementia status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CohortCounts {
    pub female_healthy: usize,
    pub male_healthy: usize,
    pub female_dementia: usize,
    pub male_dementia: usize,
}

impl CohortCounts {
    pub fn from_records(records: &[&Record]) -> Result<Self> {
        let count = |sex: &str, status: &str| -> Result<usize> {
            let criteria =
                Criteria::parse([("sex", Some(sex)), ("cognitive_status", Some(status))])?;
            Ok(filter(records.iter().copied(), &criteria)?.len())
        };
        Ok(Self {
            female_healthy: count("Female", "No dementia")?,
            male_healthy: count("Male", "No dementia")?,
            female_dementia: count("Female", "Dementia")?,
            male_dementia: count("Male", "Dementia")?,
        })
    }
}

impl fmt::Display for CohortCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Female Healthy Patients = {} | Male Healthy Patients = {}",
            self.female_healthy, self.male_healthy
        )?;
        write!(
            f,
            "Female Diseased Patients = {} | Male Diseased Patients = {}",
            self.female_dementia, self.male_dementia
        )
    }
}

// ---------------------------------------------------------------------------
// Two-group comparison
// ---------------------------------------------------------------------------

/// Mean, stdev and t-test of `measure` between two groups of records.
pub fn comparison(
    measure: Measure,
    (label_a, a): (&str, &[&Record]),
    (label_b, b): (&str, &[&Record]),
) -> String {
    let va = measure.values(a.iter().copied());
    let vb = measure.values(b.iter().copied());
    let mut out = String::new();
    for (label, values) in [(label_a, &va), (label_b, &vb)] {
        let s = Summary::of(values);
        let _ = writeln!(
            out,
            "{label}: n = {}, mean {} = {}, stdev = {}",
            s.n,
            measure.label(),
            fmt_opt(s.mean),
            fmt_opt(s.std_dev)
        );
    }
    match two_sample_t_test(&va, &vb) {
        Some(t) => {
            let _ = writeln!(out, "t-statistic: {:.4}", t.statistic);
            let _ = writeln!(out, "p-value: {:.4}", t.p_value);
        }
        None => {
            let _ = writeln!(out, "t-test: n/a (each group needs at least two donors)");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::group_by_education;
    use crate::data::model::tests::record;

    fn donor(id: &str, sex: &str, status: &str) -> Record {
        let mut r = record(id);
        r.sex = Some(sex.into());
        r.cognitive_status = Some(status.into());
        r
    }

    #[test]
    fn counts_cover_each_combination() {
        let records = vec![
            donor("1", "Female", "Dementia"),
            donor("2", "Female", "No dementia"),
            donor("3", "Male", "Dementia"),
            donor("4", "Male", "Dementia"),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        let counts = CohortCounts::from_records(&refs).unwrap();
        assert_eq!(
            counts,
            CohortCounts {
                female_healthy: 1,
                male_healthy: 0,
                female_dementia: 1,
                male_dementia: 2,
            }
        );
        assert!(counts.to_string().contains("Male Diseased Patients = 2"));
    }

    #[test]
    fn grouped_listing_prints_headings() {
        let mut a = record("a");
        a.education_level = Some("Bachelors".into());
        let records = [a, record("b")];
        let text = grouped_listing(&group_by_education(&records));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Bachelors");
        assert!(lines[1].starts_with("a | "));
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Unknown");
    }

    #[test]
    fn comparison_reports_declined_test() {
        let records = [record("a")];
        let refs: Vec<&Record> = records.iter().collect();
        let none: Vec<&Record> = Vec::new();
        let text = comparison(Measure::AmyloidBeta42, ("Female", &refs[..]), ("Male", &none[..]));
        assert!(text.contains("Female: n = 1, mean ABeta42 = 2.000"));
        assert!(text.contains("Male: n = 0"));
        assert!(text.contains("t-test: n/a"));
    }
}
