//! Projection output structures

use serde::{Deserialize, Serialize};

use crate::factors::FactorTable;

/// Whether a row was measured or extrapolated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowKind {
    Observed,
    Projected,
}

/// One point on a cohort's delinquency curve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionRow {
    pub cohort: String,
    /// Months on book
    pub age: u32,
    /// Calendar month (`YYYY-MM`) reached at this age
    pub calendar_label: String,
    /// Delinquency rate (percent)
    pub value: f64,
    pub kind: RowKind,
    /// Transition factor applied to reach this row, projected rows only
    pub factor: Option<f64>,
}

impl ProjectionRow {
    pub fn is_projected(&self) -> bool {
        self.kind == RowKind::Projected
    }
}

/// Observed and projected curve of one cohort, ordered by age
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub cohort: String,
    /// Age the projection was requested to reach
    pub target_age: u32,
    pub rows: Vec<ProjectionRow>,
}

/// ±1σ range around a projected value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FactorBand {
    pub age: u32,
    pub low: f64,
    pub high: f64,
}

/// Headline figures for a projection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionSummary {
    pub cohort: String,
    pub last_observed_age: u32,
    pub last_observed_value: f64,
    pub final_age: u32,
    pub final_calendar_label: String,
    pub final_value: f64,
    /// Projected increase in percentage points
    pub delta: f64,
    pub target_age: u32,
    /// True when a factor gap stopped the projection before `target_age`
    pub truncated: bool,
}

impl Projection {
    pub fn observed(&self) -> impl Iterator<Item = &ProjectionRow> {
        self.rows.iter().filter(|r| r.kind == RowKind::Observed)
    }

    pub fn projected(&self) -> impl Iterator<Item = &ProjectionRow> {
        self.rows.iter().filter(|r| r.kind == RowKind::Projected)
    }

    /// Last observed row
    pub fn last_observed(&self) -> Option<&ProjectionRow> {
        self.rows.iter().rev().find(|r| r.kind == RowKind::Observed)
    }

    /// Last row of any kind
    pub fn last(&self) -> Option<&ProjectionRow> {
        self.rows.last()
    }

    /// True when the curve ends short of the requested target age
    pub fn is_truncated(&self) -> bool {
        self.last().is_some_and(|row| row.age < self.target_age)
    }

    /// Headline figures, `None` for an empty projection
    pub fn summary(&self) -> Option<ProjectionSummary> {
        let observed = self.last_observed()?;
        let last = self.last()?;

        Some(ProjectionSummary {
            cohort: self.cohort.clone(),
            last_observed_age: observed.age,
            last_observed_value: observed.value,
            final_age: last.age,
            final_calendar_label: last.calendar_label.clone(),
            final_value: last.value,
            delta: last.value - observed.value,
            target_age: self.target_age,
            truncated: self.is_truncated(),
        })
    }

    /// ±1σ bands for projected rows.
    ///
    /// The band for a row scales the previous value by `factor ± σ` of its
    /// transition. Rows whose transition has no standard deviation get no band.
    pub fn factor_bands(&self, factors: &FactorTable) -> Vec<FactorBand> {
        self.projected()
            .filter_map(|row| {
                let factor = row.factor?;
                let std_dev = factors.get(row.age)?.std_dev?;
                let base = row.value / factor;
                Some(FactorBand {
                    age: row.age,
                    low: base * (factor - std_dev),
                    high: base * (factor + std_dev),
                })
            })
            .collect()
    }
}
