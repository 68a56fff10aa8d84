//! Vintage Projection - chain-ladder delinquency projection for loan origination cohorts
//!
//! This library provides:
//! - Reshaping of cohort × calendar-period matrices into months-on-book curves
//! - Simple-average age-to-age development factors with summary statistics
//! - Chain-ladder projection of immature cohorts to a target age
//! - A load → derive → project session with parallel batch projection
//! - Delimited-text ingestion and CSV export adapters

pub mod error;
pub mod cohort;
pub mod vintage;
pub mod factors;
pub mod projection;
pub mod config;
pub mod session;

// Re-export commonly used types
pub use error::VintageError;
pub use cohort::YearMonth;
pub use vintage::{ObservationMatrix, Observation, PivotMatrix};
pub use factors::{FactorEntry, FactorEstimator, FactorTable};
pub use projection::{CohortProjector, Projection, ProjectionRow, RowKind, GapPolicy};
pub use config::SessionConfig;
pub use session::{Dataset, Session};
