//! Simple-average chain-ladder development factors

use log::debug;
use serde::{Deserialize, Serialize};

use super::table::{FactorEntry, FactorTable};
use crate::error::{Result, VintageError};
use crate::vintage::PivotMatrix;

/// Default maximum transition age (months)
pub const DEFAULT_MAX_HORIZON: u32 = 24;

/// Configuration for factor estimation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorConfig {
    /// Highest transition age `t` for which a factor is estimated
    pub max_horizon: u32,
}

impl Default for FactorConfig {
    fn default() -> Self {
        Self {
            max_horizon: DEFAULT_MAX_HORIZON,
        }
    }
}

/// Estimates age-to-age factors from historical cohort curves
#[derive(Debug, Clone, Default)]
pub struct FactorEstimator {
    config: FactorConfig,
}

impl FactorEstimator {
    pub fn new(config: FactorConfig) -> Self {
        Self { config }
    }

    /// Estimator with a given horizon and otherwise default settings
    pub fn with_horizon(max_horizon: u32) -> Self {
        Self::new(FactorConfig { max_horizon })
    }

    pub fn config(&self) -> &FactorConfig {
        &self.config
    }

    /// Build the factor table for transitions `1..=max_horizon`.
    ///
    /// For transition `t` a cohort contributes `value(t) / value(t-1)` when both ages
    /// are present and `value(t-1) > 0`. Transitions with no contributing cohort get
    /// no entry. Transitions past the oldest observed age are never evaluated; the
    /// table still records the configured horizon.
    pub fn estimate(&self, pivot: &PivotMatrix) -> Result<FactorTable> {
        let horizon = self.config.max_horizon;
        if horizon < 1 {
            return Err(VintageError::InvalidHorizon(horizon));
        }

        let last_age = horizon.min(pivot.max_age().unwrap_or(0));

        let mut entries = Vec::new();
        for age in 1..=last_age {
            let ratios = transition_ratios(pivot, age);
            match FactorEntry::from_ratios(&ratios) {
                Some(entry) => entries.push((age, entry)),
                None => debug!("No development factor for transition to age {}", age),
            }
        }

        Ok(FactorTable::from_entries(horizon, entries))
    }
}

/// Individual cohort ratios for the transition `age - 1 -> age`
pub fn transition_ratios(pivot: &PivotMatrix, age: u32) -> Vec<f64> {
    if age == 0 {
        return Vec::new();
    }

    pivot
        .iter()
        .filter_map(|(_, curve)| {
            let prev = curve.get(age - 1)?;
            let curr = curve.get(age)?;
            (prev > 0.0).then(|| curr / prev)
        })
        .collect()
}
