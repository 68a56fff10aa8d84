//! Vintage Projection CLI
//!
//! Loads a vintage matrix, prints the development factors and projects one cohort

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use vintage_projection::projection::export::{write_factors_csv, write_projection_csv};
use vintage_projection::vintage::load_matrix;
use vintage_projection::projection::FactorBand;
use vintage_projection::{GapPolicy, RowKind, Session, SessionConfig};

#[derive(Debug, Parser)]
#[command(name = "vintage_projection", about = "Chain-ladder delinquency projection")]
struct Args {
    /// Semicolon-delimited vintage matrix (cohorts as rows, periods as columns)
    input: PathBuf,

    /// Cohort to project (defaults to the most recent one with observations)
    #[arg(short, long)]
    cohort: Option<String>,

    /// Target age in months on book (defaults to one past the last observed age)
    #[arg(short, long)]
    target_age: Option<u32>,

    /// JSON session config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum factor horizon, overrides the config file
    #[arg(long)]
    horizon: Option<u32>,

    /// Skip over missing factors instead of stopping
    #[arg(long)]
    skip_gaps: bool,

    /// Write the projection to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the factor table to this CSV file
    #[arg(long)]
    factors_output: Option<PathBuf>,

    /// Print the projection summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SessionConfig::from_json_path(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => SessionConfig::default(),
    };
    if let Some(horizon) = args.horizon {
        config.factors.max_horizon = horizon;
    }
    if args.skip_gaps {
        config.projection.gap_policy = GapPolicy::Skip;
    }

    let matrix = load_matrix(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    let mut session = Session::new(config);
    let dataset = session.load(matrix).context("Failed to derive dataset")?;

    println!("Vintage Projection v0.1.0");
    println!("=========================\n");
    println!("Cohorts: {}", dataset.pivot().len());
    println!("Observations: {}", dataset.observations().len());
    if dataset.dropped_negative_age() > 0 {
        println!("Dropped (period before origin): {}", dataset.dropped_negative_age());
    }

    println!("\nDevelopment Factors:");
    println!("{:>4} {:>10} {:>10} {:>10} {:>10} {:>5}", "MOB", "Mean", "StdDev", "Min", "Max", "N");
    println!("{}", "-".repeat(54));
    for (age, entry) in dataset.factors().iter() {
        let std_dev = entry
            .std_dev
            .map_or_else(|| "-".to_string(), |s| format!("{:.4}", s));
        println!(
            "{:>4} {:>10.4} {:>10} {:>10.4} {:>10.4} {:>5}",
            age, entry.mean, std_dev, entry.min, entry.max, entry.n
        );
    }
    let gaps = dataset.factors().gaps();
    if !gaps.is_empty() {
        println!("No factor for MOB: {:?}", gaps);
    }
    if let Some(last) = dataset.factors().last_age() {
        if last < dataset.factors().horizon() {
            println!("No factor past MOB {} (horizon {})", last, dataset.factors().horizon());
        }
    }

    if let Some(path) = &args.factors_output {
        write_factors_csv(path, dataset.factors())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("\nFactors written to: {}", path.display());
    }

    let cohort = match args.cohort {
        Some(cohort) => cohort,
        None => dataset
            .pivot()
            .newest_observed_cohort()
            .map(str::to_string)
            .context("Dataset has no cohort with observations")?,
    };
    let target_age = match args.target_age {
        Some(age) => age,
        None => session.default_target_age(&cohort)?,
    };

    let projection = session
        .project(&cohort, target_age)
        .with_context(|| format!("Failed to project cohort {}", cohort))?;

    println!("\nProjection for cohort {} to MOB {}:", cohort, target_age);
    let bands: BTreeMap<u32, FactorBand> = projection
        .factor_bands(dataset.factors())
        .into_iter()
        .map(|band| (band.age, band))
        .collect();

    println!(
        "{:>4} {:>8} {:>10} {:>10} {:>8} {:>17}",
        "MOB", "Month", "Rate %", "Kind", "Factor", "±1σ %"
    );
    println!("{}", "-".repeat(62));
    for row in &projection.rows {
        let kind = match row.kind {
            RowKind::Observed => "Observed",
            RowKind::Projected => "Projected",
        };
        let factor = row.factor.map_or_else(|| "-".to_string(), |f| format!("{:.3}", f));
        let band = bands.get(&row.age).map_or_else(
            || "-".to_string(),
            |b| format!("{:.2} - {:.2}", b.low, b.high),
        );
        println!(
            "{:>4} {:>8} {:>10.2} {:>10} {:>8} {:>17}",
            row.age, row.calendar_label, row.value, kind, factor, band
        );
    }

    if let Some(summary) = projection.summary() {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!("\nSummary:");
            println!("  Current MOB: {}", summary.last_observed_age);
            println!("  Current rate: {:.2}%", summary.last_observed_value);
            println!(
                "  Projected rate: {:.2}% at {} (+{:.2} pp)",
                summary.final_value, summary.final_calendar_label, summary.delta
            );
            if summary.truncated {
                println!(
                    "  Stopped at MOB {} of {}: missing development factor",
                    summary.final_age, summary.target_age
                );
            }
        }
    }

    if let Some(path) = &args.output {
        write_projection_csv(path, projection)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("\nProjection written to: {}", path.display());
    }

    Ok(())
}
