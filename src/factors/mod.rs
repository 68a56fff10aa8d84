//! Age-to-age development factors

mod table;
mod estimator;

pub use table::{FactorEntry, FactorTable};
pub use estimator::{transition_ratios, FactorConfig, FactorEstimator, DEFAULT_MAX_HORIZON};
