//! Cohort labels and calendar arithmetic

mod label;
pub mod calendar;

pub use label::YearMonth;
pub use calendar::{calendar_label, month_at, months_between};
