//! Conversion between cohort age (months on book) and calendar months

use super::label::YearMonth;

/// Calendar month reached by a cohort originated in `origin` at `age` months on book
pub fn month_at(origin: YearMonth, age: u32) -> YearMonth {
    let total = i64::from(origin.month()) + i64::from(age);
    let year = i64::from(origin.year()) + (total - 1).div_euclid(12);
    let month = (total - 1).rem_euclid(12) + 1;

    YearMonth {
        year: year as i32,
        month: month as u32,
    }
}

/// `YYYY-MM` label of the calendar month at `age`
pub fn calendar_label(origin: YearMonth, age: u32) -> String {
    month_at(origin, age).to_string()
}

/// Signed months on book of `period` for a cohort originated in `origin`.
///
/// Negative when the period precedes the origin.
pub fn months_between(origin: YearMonth, period: YearMonth) -> i32 {
    (period.year() - origin.year()) * 12 + (period.month() as i32 - origin.month() as i32)
}
