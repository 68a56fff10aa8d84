//! Project every cohort in a vintage matrix to a common age
//!
//! Outputs one combined CSV of observed and projected rows

use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use vintage_projection::projection::export::write_projections;
use vintage_projection::vintage::load_matrix;
use vintage_projection::{Session, SessionConfig};

#[derive(Debug, Parser)]
#[command(name = "project_block", about = "Project all cohorts to a target age")]
struct Args {
    /// Semicolon-delimited vintage matrix
    input: PathBuf,

    /// Target age in months on book
    #[arg(short, long, default_value_t = 24)]
    target_age: u32,

    /// JSON session config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output CSV path
    #[arg(short, long, default_value = "block_projection_output.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    let config = match &args.config {
        Some(path) => SessionConfig::from_json_path(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => SessionConfig::default(),
    };

    println!("Loading vintages from {}...", args.input.display());
    let matrix = load_matrix(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    let mut session = Session::new(config);
    let dataset = session.load(matrix)?;
    println!(
        "Loaded {} cohorts, {} factors in {:?}",
        dataset.pivot().len(),
        dataset.factors().len(),
        start.elapsed()
    );

    println!("Running projections...");
    let proj_start = Instant::now();
    let projections = session.project_all(args.target_age)?;
    println!("Projections complete in {:?}", proj_start.elapsed());

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    write_projections(file, &projections)?;
    println!("Output written to {}", args.output.display());

    println!("\nBlock Summary:");
    println!("{:>10} {:>8} {:>10} {:>8} {:>10} {:>10}", "Cohort", "LastMOB", "Current%", "FinalMOB", "Final%", "Truncated");
    for summary in projections.iter().filter_map(|p| p.summary()) {
        println!(
            "{:>10} {:>8} {:>10.2} {:>8} {:>10.2} {:>10}",
            summary.cohort,
            summary.last_observed_age,
            summary.last_observed_value,
            summary.final_age,
            summary.final_value,
            summary.truncated
        );
    }

    let truncated = projections.iter().filter(|p| p.is_truncated()).count();
    if truncated > 0 {
        println!(
            "\n{} of {} cohorts stopped short of MOB {} (missing factors)",
            truncated,
            projections.len(),
            args.target_age
        );
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
