//! Error types for the chain-ladder core

use thiserror::Error;

/// Validation failures raised by the reshaping, factor and projection stages.
///
/// All of these are structural problems with the inputs; sparse data is never an
/// error. None of them are worth retrying since the computations are deterministic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VintageError {
    /// A cohort or period label is not of the form `YYYY-MM...`
    #[error("Malformed cohort label: {label:?} (expected YYYY-MM)")]
    MalformedCohortLabel { label: String },

    /// The observation matrix has no rows or no columns
    #[error("Observation matrix is empty")]
    EmptyMatrix,

    /// A matrix row does not have one cell per period column
    #[error("Row for cohort {cohort} has {actual} cells, expected {expected}")]
    ShapeMismatch {
        cohort: String,
        expected: usize,
        actual: usize,
    },

    /// Factor horizon must cover at least one transition
    #[error("Invalid factor horizon: {0} (must be at least 1)")]
    InvalidHorizon(u32),

    #[error("Cohort {0} not found")]
    CohortNotFound(String),

    #[error("Cohort {0} has no observed values")]
    NoObservations(String),

    /// A projection was requested before any dataset was loaded
    #[error("No dataset loaded")]
    NoDataset,
}

pub type Result<T> = std::result::Result<T, VintageError>;
