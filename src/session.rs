//! Load → derive → project session
//!
//! A `Session` derives the pivot and factor table once per dataset and then serves
//! any number of projections against that immutable state. Loading a new dataset
//! swaps it in whole; a failed load leaves the previous dataset in place.
//!
//! # Example
//! ```ignore
//! let mut session = Session::new(SessionConfig::default());
//! session.load(load_matrix("vintages.csv")?)?;
//!
//! let projection = session.project("2024-03", 24)?;
//! println!("{:?}", projection.summary());
//! ```

use std::sync::Arc;

use log::{debug, info};
use rayon::prelude::*;

use crate::config::SessionConfig;
use crate::error::{Result, VintageError};
use crate::factors::{FactorEstimator, FactorTable};
use crate::projection::{CohortProjector, Projection};
use crate::vintage::{reshape, Observation, ObservationMatrix, PivotMatrix};

/// Everything derived from one uploaded matrix
#[derive(Debug, Clone)]
pub struct Dataset {
    matrix: ObservationMatrix,
    observations: Vec<Observation>,
    pivot: PivotMatrix,
    factors: FactorTable,
    dropped_negative_age: usize,
    duplicate_ages: usize,
}

impl Dataset {
    /// Reshape the matrix and estimate factors
    pub fn derive(matrix: ObservationMatrix, config: &SessionConfig) -> Result<Self> {
        let reshaped = reshape(&matrix)?;
        let factors = FactorEstimator::new(config.factors.clone()).estimate(&reshaped.pivot)?;

        Ok(Self {
            matrix,
            observations: reshaped.observations,
            pivot: reshaped.pivot,
            factors,
            dropped_negative_age: reshaped.dropped_negative_age,
            duplicate_ages: reshaped.duplicate_ages,
        })
    }

    pub fn matrix(&self) -> &ObservationMatrix {
        &self.matrix
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn pivot(&self) -> &PivotMatrix {
        &self.pivot
    }

    pub fn factors(&self) -> &FactorTable {
        &self.factors
    }

    pub fn dropped_negative_age(&self) -> usize {
        self.dropped_negative_age
    }

    pub fn duplicate_ages(&self) -> usize {
        self.duplicate_ages
    }
}

/// Holds the current dataset and the active projection
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: SessionConfig,
    dataset: Option<Arc<Dataset>>,
    active: Option<Projection>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            dataset: None,
            active: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Derive a dataset from `matrix` and make it current.
    ///
    /// Clears the active projection. On error the previous dataset stays loaded.
    pub fn load(&mut self, matrix: ObservationMatrix) -> Result<Arc<Dataset>> {
        let dataset = Arc::new(Dataset::derive(matrix, &self.config)?);

        info!(
            "Loaded {} cohorts, {} observations, {} development factors (horizon {})",
            dataset.pivot.len(),
            dataset.observations.len(),
            dataset.factors.len(),
            dataset.factors.horizon()
        );
        if dataset.dropped_negative_age > 0 {
            info!(
                "Dropped {} cells reported before their cohort's origin",
                dataset.dropped_negative_age
            );
        }

        self.dataset = Some(Arc::clone(&dataset));
        self.active = None;
        Ok(dataset)
    }

    /// Current dataset, shared read-only
    pub fn dataset(&self) -> Option<&Arc<Dataset>> {
        self.dataset.as_ref()
    }

    fn require_dataset(&self) -> Result<&Arc<Dataset>> {
        self.dataset.as_ref().ok_or(VintageError::NoDataset)
    }

    /// Project `cohort` to `target_age`, replacing the active projection
    pub fn project(&mut self, cohort: &str, target_age: u32) -> Result<&Projection> {
        let dataset = self.require_dataset()?;
        let projection = CohortProjector::new(
            &dataset.pivot,
            &dataset.factors,
            self.config.projection.clone(),
        )
        .project(cohort, target_age)?;

        if projection.is_truncated() {
            debug!(
                "Projection of {} reached age {} of requested {}",
                cohort,
                projection.last().map_or(0, |r| r.age),
                target_age
            );
        }

        Ok(&*self.active.insert(projection))
    }

    /// Most recent successful projection since the last load
    pub fn active_projection(&self) -> Option<&Projection> {
        self.active.as_ref()
    }

    /// Project every cohort with observations to `target_age` in parallel.
    ///
    /// Cohorts without any observed value are skipped. Results are in cohort label
    /// order. The active projection is left untouched.
    pub fn project_all(&self, target_age: u32) -> Result<Vec<Projection>> {
        let dataset = self.require_dataset()?;
        let projector = CohortProjector::new(
            &dataset.pivot,
            &dataset.factors,
            self.config.projection.clone(),
        );

        let labels: Vec<&str> = dataset.pivot.labels().collect();
        let results: Vec<Result<Projection>> = labels
            .par_iter()
            .map(|label| projector.project(label, target_age))
            .collect();

        let mut projections = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(projection) => projections.push(projection),
                Err(VintageError::NoObservations(cohort)) => {
                    debug!("Skipping cohort {} with no observations", cohort);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(projections)
    }

    /// One month past the cohort's last observed age, saturating at `u32::MAX`
    pub fn default_target_age(&self, cohort: &str) -> Result<u32> {
        let dataset = self.require_dataset()?;
        let curve = dataset
            .pivot
            .cohort(cohort)
            .ok_or_else(|| VintageError::CohortNotFound(cohort.to_string()))?;
        let (last_age, _) = curve
            .last_observed()
            .ok_or_else(|| VintageError::NoObservations(cohort.to_string()))?;
        Ok(last_age.saturating_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::GapPolicy;
    use crate::vintage::load_matrix;
    use approx::assert_relative_eq;

    fn sample_matrix() -> ObservationMatrix {
        load_matrix("data/sample_vintages.csv").expect("Failed to load sample")
    }

    fn loaded_session() -> Session {
        let mut session = Session::new(SessionConfig::default());
        session.load(sample_matrix()).unwrap();
        session
    }

    #[test]
    fn test_derive_sample_dataset() {
        let session = loaded_session();
        let dataset = session.dataset().unwrap();

        assert_eq!(dataset.pivot().len(), 6);
        assert_eq!(dataset.observations().len(), 21);
        assert_eq!(dataset.dropped_negative_age(), 0);

        let factors = dataset.factors();
        // 2023-04 starts at 0% and is left out of the first transition
        assert_eq!(factors.get(1).unwrap().n, 4);
        assert_eq!(factors.get(2).unwrap().n, 4);
        assert_eq!(factors.get(3).unwrap().n, 3);
        assert_eq!(factors.get(5).unwrap().n, 1);
        assert_relative_eq!(factors.mean(5).unwrap(), 1.05, epsilon = 1e-12);
        assert!(factors.get(6).is_none());
    }

    #[test]
    fn test_project_newest_cohort() {
        let mut session = loaded_session();
        let projection = session.project("2023-06", 12).unwrap().clone();

        assert_eq!(projection.observed().count(), 1);
        // Factors exist for transitions 1..=5 only
        assert_eq!(projection.projected().count(), 5);
        assert_eq!(projection.last().unwrap().age, 5);
        assert_eq!(projection.last().unwrap().calendar_label, "2023-11");
        assert!(projection.is_truncated());

        assert_eq!(session.active_projection(), Some(&projection));
    }

    #[test]
    fn test_projection_replaces_active() {
        let mut session = loaded_session();
        session.project("2023-06", 3).unwrap();
        session.project("2023-05", 3).unwrap();
        assert_eq!(session.active_projection().unwrap().cohort, "2023-05");
    }

    #[test]
    fn test_failed_projection_keeps_active() {
        let mut session = loaded_session();
        session.project("2023-06", 3).unwrap();
        let err = session.project("1999-01", 3).unwrap_err();
        assert_eq!(err, VintageError::CohortNotFound("1999-01".to_string()));
        assert_eq!(session.active_projection().unwrap().cohort, "2023-06");
    }

    #[test]
    fn test_reload_clears_active_projection() {
        let mut session = loaded_session();
        session.project("2023-06", 3).unwrap();
        session.load(sample_matrix()).unwrap();
        assert!(session.active_projection().is_none());
    }

    #[test]
    fn test_failed_load_keeps_previous_dataset() {
        let mut session = loaded_session();
        let empty = ObservationMatrix::from_rows(Vec::new(), Vec::new()).unwrap();
        assert_eq!(session.load(empty).unwrap_err(), VintageError::EmptyMatrix);
        assert_eq!(session.dataset().unwrap().pivot().len(), 6);
    }

    #[test]
    fn test_no_dataset() {
        let mut session = Session::default();
        assert_eq!(session.project("2023-01", 3).unwrap_err(), VintageError::NoDataset);
        assert_eq!(session.project_all(3).unwrap_err(), VintageError::NoDataset);
        assert_eq!(session.default_target_age("2023-01").unwrap_err(), VintageError::NoDataset);
    }

    #[test]
    fn test_invalid_horizon_on_load() {
        let mut config = SessionConfig::default();
        config.factors.max_horizon = 0;
        let mut session = Session::new(config);
        assert_eq!(
            session.load(sample_matrix()).unwrap_err(),
            VintageError::InvalidHorizon(0)
        );
    }

    #[test]
    fn test_project_all_matches_single() {
        let mut session = loaded_session();
        let all = session.project_all(8).unwrap();
        assert_eq!(all.len(), 6);
        assert!(all.windows(2).all(|w| w[0].cohort < w[1].cohort));

        let single = session.project("2023-03", 8).unwrap().clone();
        let from_batch = all.iter().find(|p| p.cohort == "2023-03").unwrap();
        assert_eq!(&single, from_batch);
    }

    #[test]
    fn test_project_all_skips_empty_cohorts() {
        let matrix = ObservationMatrix::from_rows(
            vec!["2023-01".to_string(), "2023-02".to_string()],
            vec![
                ("2023-01".to_string(), vec![Some(1.0), Some(2.0)]),
                ("2023-02".to_string(), vec![None, None]),
            ],
        )
        .unwrap();
        let mut session = Session::default();
        session.load(matrix).unwrap();

        let all = session.project_all(3).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].cohort, "2023-01");
    }

    #[test]
    fn test_default_target_age() {
        let session = loaded_session();
        assert_eq!(session.default_target_age("2023-01").unwrap(), 6);
        assert_eq!(session.default_target_age("2023-06").unwrap(), 1);
    }

    #[test]
    fn test_skip_policy_session() {
        let matrix = ObservationMatrix::from_rows(
            vec!["2023-01".to_string(), "2023-02".to_string(), "2023-03".to_string()],
            vec![
                // Only transition 2 has data
                ("2023-01".to_string(), vec![Some(0.0), Some(1.0), Some(2.0)]),
                ("2023-03".to_string(), vec![None, None, Some(0.5)]),
            ],
        )
        .unwrap();

        let mut config = SessionConfig::default();
        config.projection.gap_policy = GapPolicy::Skip;
        let mut session = Session::new(config);
        session.load(matrix).unwrap();

        let projection = session.project("2023-03", 4).unwrap();
        let projected: Vec<u32> = projection.projected().map(|r| r.age).collect();
        assert_eq!(projected, vec![2]);
        assert_relative_eq!(projection.last().unwrap().value, 1.0);
    }
}
