//! Development factor table

use std::collections::BTreeMap;

use serde::Serialize;

/// Summary of the individual cohort ratios for one age transition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorEntry {
    /// Simple (unweighted) average of cohort ratios
    pub mean: f64,
    /// Sample standard deviation; `None` with a single ratio
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
    /// Number of contributing cohorts
    pub n: usize,
}

impl FactorEntry {
    /// Summarize a set of ratios, `None` if empty
    pub fn from_ratios(ratios: &[f64]) -> Option<Self> {
        if ratios.is_empty() {
            return None;
        }

        let n = ratios.len();
        let mean = ratios.iter().sum::<f64>() / n as f64;
        let min = ratios.iter().copied().fold(f64::INFINITY, f64::min);
        let max = ratios.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let std_dev = (n > 1).then(|| {
            let ss: f64 = ratios.iter().map(|r| (r - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        });

        Some(Self { mean, std_dev, min, max, n })
    }
}

/// Factor entries keyed by transition age `t` (value at `t` over value at `t-1`).
///
/// Only ages with at least one valid ratio have an entry; a missing age is a gap,
/// not a factor of zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorTable {
    horizon: u32,
    entries: BTreeMap<u32, FactorEntry>,
}

impl FactorTable {
    /// Build a table from explicit entries. Entries beyond `horizon` or at age 0 are ignored.
    pub fn from_entries<I>(horizon: u32, entries: I) -> Self
    where
        I: IntoIterator<Item = (u32, FactorEntry)>,
    {
        let entries = entries
            .into_iter()
            .filter(|(age, _)| (1..=horizon).contains(age))
            .collect();
        Self { horizon, entries }
    }

    /// Maximum transition age considered when the table was built
    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    pub fn get(&self, age: u32) -> Option<&FactorEntry> {
        self.entries.get(&age)
    }

    /// Mean factor for transition `age`
    pub fn mean(&self, age: u32) -> Option<f64> {
        self.entries.get(&age).map(|e| e.mean)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &FactorEntry)> {
        self.entries.iter().map(|(&age, entry)| (age, entry))
    }

    /// Highest transition age with a factor
    pub fn last_age(&self) -> Option<u32> {
        self.entries.keys().next_back().copied()
    }

    /// Missing transition ages below the highest factor.
    ///
    /// These are the holes that interrupt the chain; everything past
    /// [`last_age`](Self::last_age) is uncovered as well.
    pub fn gaps(&self) -> Vec<u32> {
        let last = self.last_age().unwrap_or(0);
        (1..=last)
            .filter(|age| !self.entries.contains_key(age))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
