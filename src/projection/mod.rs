//! Chain-ladder projection of cohort curves

mod rows;
mod engine;
pub mod export;

pub use rows::{FactorBand, Projection, ProjectionRow, ProjectionSummary, RowKind};
pub use engine::{CohortProjector, GapPolicy, ProjectionConfig};
