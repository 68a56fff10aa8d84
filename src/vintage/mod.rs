//! Vintage observation matrices and their months-on-book reshaping

mod matrix;
mod pivot;
mod reshape;
pub mod loader;

pub use matrix::ObservationMatrix;
pub use pivot::{CohortCurve, PivotMatrix};
pub use reshape::{reshape, Observation, Reshaped};
pub use loader::{load_matrix, load_matrix_from_reader, LoadError};
