//! Reshape a cohort × period matrix into months-on-book form

use log::warn;
use serde::Serialize;

use super::matrix::ObservationMatrix;
use super::pivot::PivotMatrix;
use crate::cohort::{months_between, YearMonth};
use crate::error::{Result, VintageError};

/// One present cell of the observation matrix, tagged with its age
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub cohort: String,
    pub period: String,
    /// Months on book, always >= 0
    pub age: u32,
    pub value: f64,
}

/// Output of [`reshape`]
#[derive(Debug, Clone)]
pub struct Reshaped {
    /// Valid observations in matrix order (row by row, then column)
    pub observations: Vec<Observation>,
    pub pivot: PivotMatrix,
    /// Present cells discarded because the period precedes the cohort origin
    pub dropped_negative_age: usize,
    /// Observations that overwrote an earlier value for the same (cohort, age)
    pub duplicate_ages: usize,
}

/// Convert the matrix to observations and the cohort × age pivot.
///
/// All labels are validated before any cell is read. Cells whose period precedes the
/// cohort origin are dropped with a warning. If two periods map to the same
/// (cohort, age) the later column wins.
pub fn reshape(matrix: &ObservationMatrix) -> Result<Reshaped> {
    if matrix.is_empty() {
        return Err(VintageError::EmptyMatrix);
    }

    let origins = parse_labels(matrix.cohorts())?;
    let periods = parse_labels(matrix.periods())?;

    let mut observations = Vec::with_capacity(matrix.present_count());
    let mut pivot = PivotMatrix::new();
    let mut dropped_negative_age = 0;
    let mut duplicate_ages = 0;

    for ((cohort, cells), &origin) in matrix.rows().zip(&origins) {
        let curve = pivot.ensure_cohort(cohort, origin);

        for ((period_label, &period), cell) in matrix.periods().iter().zip(&periods).zip(cells) {
            let Some(value) = *cell else { continue };

            let age = months_between(origin, period);
            if age < 0 {
                warn!(
                    "Dropping value {} for cohort {} at period {} (period precedes origin)",
                    value, cohort, period_label
                );
                dropped_negative_age += 1;
                continue;
            }
            let age = age as u32;

            if let Some(previous) = curve.set(age, value) {
                warn!(
                    "Duplicate age {} for cohort {}: {} replaced by {} from period {}",
                    age, cohort, previous, value, period_label
                );
                duplicate_ages += 1;
            }

            observations.push(Observation {
                cohort: cohort.to_string(),
                period: period_label.clone(),
                age,
                value,
            });
        }
    }

    Ok(Reshaped {
        observations,
        pivot,
        dropped_negative_age,
        duplicate_ages,
    })
}

fn parse_labels(labels: &[String]) -> Result<Vec<YearMonth>> {
    labels.iter().map(|label| YearMonth::parse(label)).collect()
}
