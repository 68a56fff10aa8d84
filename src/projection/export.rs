//! CSV export of projections and factor tables

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::rows::{Projection, RowKind};
use crate::factors::FactorTable;

#[derive(Serialize)]
struct ProjectionRecord<'a> {
    cohort: &'a str,
    age: u32,
    calendar_label: &'a str,
    value: f64,
    kind: RowKind,
    factor: Option<f64>,
}

#[derive(Serialize)]
struct FactorRecord {
    age: u32,
    mean: f64,
    std_dev: Option<f64>,
    min: f64,
    max: f64,
    n: usize,
}

/// Write projections as `cohort,age,calendar_label,value,kind,factor`.
///
/// `factor` is left empty for observed rows.
pub fn write_projections<'a, W, I>(writer: W, projections: I) -> Result<(), csv::Error>
where
    W: Write,
    I: IntoIterator<Item = &'a Projection>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut wrote_any = false;
    for projection in projections {
        for row in &projection.rows {
            csv_writer.serialize(ProjectionRecord {
                cohort: &row.cohort,
                age: row.age,
                calendar_label: &row.calendar_label,
                value: row.value,
                kind: row.kind,
                factor: row.factor,
            })?;
            wrote_any = true;
        }
    }

    // serialize() only emits the header alongside the first record
    if !wrote_any {
        csv_writer.write_record(["cohort", "age", "calendar_label", "value", "kind", "factor"])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write one projection to a CSV file
pub fn write_projection_csv<P: AsRef<Path>>(path: P, projection: &Projection) -> Result<(), csv::Error> {
    let file = File::create(path)?;
    write_projections(file, [projection])
}

/// Write a factor table as `age,mean,std_dev,min,max,n`
pub fn write_factors<W: Write>(writer: W, factors: &FactorTable) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    if factors.is_empty() {
        csv_writer.write_record(["age", "mean", "std_dev", "min", "max", "n"])?;
    }

    for (age, entry) in factors.iter() {
        csv_writer.serialize(FactorRecord {
            age,
            mean: entry.mean,
            std_dev: entry.std_dev,
            min: entry.min,
            max: entry.max,
            n: entry.n,
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write a factor table to a CSV file
pub fn write_factors_csv<P: AsRef<Path>>(path: P, factors: &FactorTable) -> Result<(), csv::Error> {
    let file = File::create(path)?;
    write_factors(file, factors)
}
