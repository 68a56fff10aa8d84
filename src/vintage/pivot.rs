//! Cohort × age (months on book) pivot

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cohort::YearMonth;
use crate::error::Result;

/// Observed curve of one cohort: origin month plus age → value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortCurve {
    origin: YearMonth,
    values: BTreeMap<u32, f64>,
}

impl CohortCurve {
    pub fn new(origin: YearMonth) -> Self {
        Self {
            origin,
            values: BTreeMap::new(),
        }
    }

    pub fn origin(&self) -> YearMonth {
        self.origin
    }

    /// Present values keyed by age, in increasing age order
    pub fn values(&self) -> &BTreeMap<u32, f64> {
        &self.values
    }

    pub fn get(&self, age: u32) -> Option<f64> {
        self.values.get(&age).copied()
    }

    /// Highest observed age and its value
    pub fn last_observed(&self) -> Option<(u32, f64)> {
        self.values.iter().next_back().map(|(&age, &value)| (age, value))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Set a value, returning the one it replaced
    pub(crate) fn set(&mut self, age: u32, value: f64) -> Option<f64> {
        self.values.insert(age, value)
    }
}

/// Mapping of cohort label → curve.
///
/// Cohorts are keyed by their full label and iterate in label order, which is
/// chronological for `YYYY-MM` labels. A cohort may be present with an empty
/// curve when the source matrix had a row for it but no observed cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PivotMatrix {
    cohorts: BTreeMap<String, CohortCurve>,
}

impl PivotMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pivot directly from `(cohort label, [(age, value)])` curves
    pub fn from_curves<I, S, V>(curves: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: IntoIterator<Item = (u32, f64)>,
    {
        let mut pivot = Self::new();
        for (label, values) in curves {
            let label = label.into();
            let origin = YearMonth::parse(&label)?;
            let curve = pivot.ensure_cohort(&label, origin);
            for (age, value) in values {
                curve.set(age, value);
            }
        }
        Ok(pivot)
    }

    /// Get or create the curve for `label`
    pub(crate) fn ensure_cohort(&mut self, label: &str, origin: YearMonth) -> &mut CohortCurve {
        self.cohorts
            .entry(label.to_string())
            .or_insert_with(|| CohortCurve::new(origin))
    }

    pub fn cohort(&self, label: &str) -> Option<&CohortCurve> {
        self.cohorts.get(label)
    }

    /// Value at (cohort, age) if present
    pub fn value(&self, label: &str, age: u32) -> Option<f64> {
        self.cohorts.get(label).and_then(|c| c.get(age))
    }

    /// Iterate `(label, curve)` in label order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CohortCurve)> {
        self.cohorts.iter().map(|(label, curve)| (label.as_str(), curve))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.cohorts.keys().map(String::as_str)
    }

    /// Cohort labels, most recent first (selector ordering)
    pub fn cohorts_newest_first(&self) -> Vec<&str> {
        self.cohorts.keys().rev().map(String::as_str).collect()
    }

    /// Most recent cohort with at least one observed value
    pub fn newest_observed_cohort(&self) -> Option<&str> {
        self.cohorts_newest_first()
            .into_iter()
            .find(|label| self.last_observed(label).is_some())
    }

    /// Highest observed age and value for a cohort
    pub fn last_observed(&self, label: &str) -> Option<(u32, f64)> {
        self.cohorts.get(label).and_then(CohortCurve::last_observed)
    }

    /// Highest age observed in any cohort
    pub fn max_age(&self) -> Option<u32> {
        self.cohorts
            .values()
            .filter_map(|c| c.last_observed().map(|(age, _)| age))
            .max()
    }

    pub fn len(&self) -> usize {
        self.cohorts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cohorts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VintageError;

    fn sample() -> PivotMatrix {
        PivotMatrix::from_curves(vec![
            ("2023-01", vec![(0, 1.0), (1, 2.0), (2, 3.0)]),
            ("2023-02", vec![(0, 0.5), (1, 1.5)]),
            ("2023-03", vec![]),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup() {
        let pivot = sample();
        assert_eq!(pivot.len(), 3);
        assert_eq!(pivot.value("2023-01", 2), Some(3.0));
        assert_eq!(pivot.value("2023-02", 2), None);
        assert_eq!(pivot.value("2024-01", 0), None);
        assert!(pivot.cohort("2023-03").unwrap().is_empty());
    }

    #[test]
    fn test_last_observed() {
        let pivot = sample();
        assert_eq!(pivot.last_observed("2023-01"), Some((2, 3.0)));
        assert_eq!(pivot.last_observed("2023-03"), None);
        assert_eq!(pivot.max_age(), Some(2));
    }

    #[test]
    fn test_newest_first() {
        let pivot = sample();
        assert_eq!(pivot.cohorts_newest_first(), vec!["2023-03", "2023-02", "2023-01"]);
        // 2023-03 has a row but nothing observed
        assert_eq!(pivot.newest_observed_cohort(), Some("2023-02"));
        assert_eq!(PivotMatrix::new().newest_observed_cohort(), None);
    }

    #[test]
    fn test_bad_label() {
        let err = PivotMatrix::from_curves(vec![("Jan-23", vec![(0, 1.0)])]).unwrap_err();
        assert!(matches!(err, VintageError::MalformedCohortLabel { .. }));
    }
}
