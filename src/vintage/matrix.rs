//! Raw cohort × calendar-period observation matrix

use crate::error::{Result, VintageError};

/// Cumulative delinquency rates (percent) by origination cohort and calendar period.
///
/// Rows are cohorts, columns are periods. A cell is `None` when the period has not
/// been observed for that cohort (or does not apply). Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationMatrix {
    cohorts: Vec<String>,
    periods: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

impl ObservationMatrix {
    /// Build a matrix from period labels and `(cohort label, cells)` rows.
    ///
    /// Every row must carry exactly one cell per period.
    pub fn from_rows<I>(periods: Vec<String>, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Vec<Option<f64>>)>,
    {
        let mut cohorts = Vec::new();
        let mut cells = Vec::new();

        for (cohort, row) in rows {
            if row.len() != periods.len() {
                return Err(VintageError::ShapeMismatch {
                    cohort,
                    expected: periods.len(),
                    actual: row.len(),
                });
            }
            cohorts.push(cohort);
            cells.push(row);
        }

        Ok(Self { cohorts, periods, cells })
    }

    /// Cohort (row) labels in input order
    pub fn cohorts(&self) -> &[String] {
        &self.cohorts
    }

    /// Period (column) labels in input order
    pub fn periods(&self) -> &[String] {
        &self.periods
    }

    /// Cell at (row, column), `None` if absent or out of range
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// Iterate `(cohort, cells)` rows
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.cohorts
            .iter()
            .zip(&self.cells)
            .map(|(cohort, row)| (cohort.as_str(), row.as_slice()))
    }

    pub fn n_cohorts(&self) -> usize {
        self.cohorts.len()
    }

    pub fn n_periods(&self) -> usize {
        self.periods.len()
    }

    /// True when there are no rows or no columns
    pub fn is_empty(&self) -> bool {
        self.cohorts.is_empty() || self.periods.is_empty()
    }

    /// Number of present cells
    pub fn present_count(&self) -> usize {
        self.cells.iter().flatten().filter(|v| v.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn periods() -> Vec<String> {
        vec!["2023-01".to_string(), "2023-02".to_string()]
    }

    #[test]
    fn test_from_rows() {
        let matrix = ObservationMatrix::from_rows(
            periods(),
            vec![
                ("2023-01".to_string(), vec![Some(1.0), Some(2.0)]),
                ("2023-02".to_string(), vec![None, Some(0.5)]),
            ],
        )
        .unwrap();

        assert_eq!(matrix.n_cohorts(), 2);
        assert_eq!(matrix.n_periods(), 2);
        assert_eq!(matrix.value(0, 1), Some(2.0));
        assert_eq!(matrix.value(1, 0), None);
        assert_eq!(matrix.value(5, 0), None);
        assert_eq!(matrix.present_count(), 3);
        assert!(!matrix.is_empty());
    }

    #[test]
    fn test_ragged_row_rejected() {
        let err = ObservationMatrix::from_rows(
            periods(),
            vec![("2023-01".to_string(), vec![Some(1.0)])],
        )
        .unwrap_err();

        assert_eq!(
            err,
            VintageError::ShapeMismatch {
                cohort: "2023-01".to_string(),
                expected: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn test_empty_matrix() {
        let no_rows = ObservationMatrix::from_rows(periods(), Vec::new()).unwrap();
        assert!(no_rows.is_empty());

        let no_cols =
            ObservationMatrix::from_rows(Vec::new(), vec![("2023-01".to_string(), Vec::new())])
                .unwrap();
        assert!(no_cols.is_empty());
    }
}
