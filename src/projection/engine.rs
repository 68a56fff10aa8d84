//! Chain-ladder projection of a single cohort

use log::debug;
use serde::{Deserialize, Serialize};

use super::rows::{Projection, ProjectionRow, RowKind};
use crate::cohort::calendar_label;
use crate::error::{Result, VintageError};
use crate::factors::FactorTable;
use crate::vintage::PivotMatrix;

/// What to do when the factor for the next age is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapPolicy {
    /// End the projection at the first missing factor
    #[default]
    Stop,
    /// Leave the missing age out and keep chaining from the last projected value
    Skip,
}

/// Configuration for a projection run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub gap_policy: GapPolicy,
}

/// Projects cohorts forward over a fixed pivot and factor table
pub struct CohortProjector<'a> {
    pivot: &'a PivotMatrix,
    factors: &'a FactorTable,
    config: ProjectionConfig,
}

impl<'a> CohortProjector<'a> {
    pub fn new(pivot: &'a PivotMatrix, factors: &'a FactorTable, config: ProjectionConfig) -> Self {
        Self {
            pivot,
            factors,
            config,
        }
    }

    /// Observed curve of `cohort` followed by projected values up to `target_age`.
    ///
    /// A `target_age` at or below the last observed age yields only observed rows.
    /// Projection never runs past the factor table's horizon.
    pub fn project(&self, cohort: &str, target_age: u32) -> Result<Projection> {
        let curve = self
            .pivot
            .cohort(cohort)
            .ok_or_else(|| VintageError::CohortNotFound(cohort.to_string()))?;
        let (last_age, last_value) = curve
            .last_observed()
            .ok_or_else(|| VintageError::NoObservations(cohort.to_string()))?;
        let origin = curve.origin();

        let mut rows: Vec<ProjectionRow> = curve
            .values()
            .iter()
            .map(|(&age, &value)| ProjectionRow {
                cohort: cohort.to_string(),
                age,
                calendar_label: calendar_label(origin, age),
                value,
                kind: RowKind::Observed,
                factor: None,
            })
            .collect();

        // No factor exists past the table horizon
        let last_projectable = target_age.min(self.factors.horizon());

        let mut current = last_value;
        for age in last_age.saturating_add(1)..=last_projectable {
            let Some(factor) = self.factors.mean(age) else {
                match self.config.gap_policy {
                    GapPolicy::Stop => {
                        debug!(
                            "Projection of {} stopped at age {}: no factor (target {})",
                            cohort, age, target_age
                        );
                        break;
                    }
                    GapPolicy::Skip => {
                        debug!("Projection of {} skipped age {}: no factor", cohort, age);
                        continue;
                    }
                }
            };

            current *= factor;
            rows.push(ProjectionRow {
                cohort: cohort.to_string(),
                age,
                calendar_label: calendar_label(origin, age),
                value: current,
                kind: RowKind::Projected,
                factor: Some(factor),
            });
        }

        Ok(Projection {
            cohort: cohort.to_string(),
            target_age,
            rows,
        })
    }
}
