use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use neuro_cohort::config::ColumnConfig;
use neuro_cohort::data::{self, Attribute, Criteria, GroupBy, Record, SortKey};
use neuro_cohort::report::{self, CohortCounts};
use neuro_cohort::stats::{summarize_groups, Measure};

/// Merge a biomarker table with clinical metadata and print a cohort report.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Biomarker (Luminex) table: .csv, .tsv, .json or .parquet
    biomarkers: PathBuf,

    /// Clinical metadata table
    metadata: PathBuf,

    /// JSON file overriding the expected column headers
    #[arg(long)]
    columns: Option<PathBuf>,

    /// Restrict the report to donors matching ATTRIBUTE=VALUE (repeatable)
    #[arg(long = "where", value_name = "ATTRIBUTE=VALUE")]
    constraints: Vec<String>,

    /// Key for the sorted listing (id, abeta40, abeta42, ttau, ptau, death_age, thal)
    #[arg(long, default_value = "abeta42")]
    sort_by: SortKey,

    /// Biomarker compared between female and male donors
    #[arg(long, default_value = "abeta42")]
    measure: Measure,

    /// Only use donors with dementia or unknown cognitive status for the tau-by-education table
    #[arg(long)]
    dementia_only: bool,
}

fn parse_constraints(raw: &[String]) -> Result<Criteria> {
    let pairs = raw
        .iter()
        .map(|c| {
            c.split_once('=')
                .map(|(name, value)| (name, Some(value)))
                .with_context(|| format!("expected ATTRIBUTE=VALUE, got '{c}'"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Criteria::parse(pairs)?)
}

fn with_sex<'a>(records: &[&'a Record], criteria: &Criteria, sex: &str) -> Result<Vec<&'a Record>> {
    let mut criteria = criteria.clone();
    criteria.constrain(Attribute::Sex, sex);
    Ok(data::filter(records.iter().copied(), &criteria)?)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let columns = match &args.columns {
        Some(path) => ColumnConfig::from_json_file(path)?,
        None => ColumnConfig::default(),
    };
    let criteria = parse_constraints(&args.constraints)?;

    let luminex = data::read_table(&args.biomarkers).context("reading biomarker table")?;
    let meta = data::read_table(&args.metadata).context("reading metadata table")?;

    let loaded = data::load_records(&luminex, &columns.biomarker)?;
    let mut records = loaded.records;
    let misses = data::merge_metadata(&mut records, &meta, &columns.metadata)?;
    log::info!(
        "{} records, {} biomarker rows skipped, {} metadata rows unmatched",
        records.len(),
        loaded.warnings.len(),
        misses.len()
    );

    println!("== Records ==");
    print!("{}", report::record_listing(&records));

    let mut selected = data::filter(&records, &criteria)?;
    if !criteria.is_unconstrained() {
        println!("\n== {} donors match the filter ==", selected.len());
    }

    println!("\n== Sorted by {} ==", args.sort_by);
    data::sort_records(&mut selected, args.sort_by);
    print!("{}", report::record_listing(selected.iter().copied()));

    println!("\n== By education, sorted by Thal score ==");
    let mut groups = data::group_by_education(selected.iter().copied());
    data::sort_within_group_by_neuropathology(&mut groups);
    print!("{}", report::grouped_listing(&groups));

    println!("== Counts ==");
    println!("{}", CohortCounts::from_records(&selected)?);

    println!("\n== {} by sex ==", args.measure.label());
    let female = with_sex(&selected, &criteria, "Female")?;
    let male = with_sex(&selected, &criteria, "Male")?;
    print!(
        "{}",
        report::comparison(args.measure, ("Female", &female[..]), ("Male", &male[..]))
    );

    let tau_pool = if args.dementia_only {
        data::dementia_or_unknown(selected.iter().copied())
    } else {
        selected.clone()
    };
    let ed_groups = data::group_by(tau_pool.iter().copied(), GroupBy::EducationLevel);
    for measure in [Measure::TotalTau, Measure::PhosphoTau] {
        println!("\n== {} by education ==", measure.label());
        print!(
            "{}",
            report::group_summary_table(&summarize_groups(&ed_groups, measure), measure)
        );
    }

    Ok(())
}
