//! Year-month labels for cohorts and calendar periods
//!
//! Labels follow the `YYYY-MM` convention: the first four characters are the year
//! and characters 5..7 are the month. Anything after the month is ignored, so
//! `2023-01-31` and `2023-01 (Q1)` both parse as January 2023.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Result, VintageError};

/// A calendar month, used both for cohort origins and observation periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    pub(crate) year: i32,
    pub(crate) month: u32,
}

impl YearMonth {
    /// Build a year-month, rejecting months outside 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Parse a `YYYY-MM...` label
    pub fn parse(label: &str) -> Result<Self> {
        let year_part = label.get(0..4).ok_or_else(|| malformed(label))?;
        let month_part = label.get(5..7).ok_or_else(|| malformed(label))?;

        if !is_digits(year_part) || !is_digits(month_part) {
            return Err(malformed(label));
        }

        let year: i32 = year_part.parse().map_err(|_| malformed(label))?;
        let month: u32 = month_part.parse().map_err(|_| malformed(label))?;

        Self::new(year, month).ok_or_else(|| malformed(label))
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month of year (1-12)
    pub fn month(&self) -> u32 {
        self.month
    }
}

impl FromStr for YearMonth {
    type Err = VintageError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

fn malformed(label: &str) -> VintageError {
    VintageError::MalformedCohortLabel {
        label: label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_label() {
        let ym = YearMonth::parse("2023-01").unwrap();
        assert_eq!(ym.year(), 2023);
        assert_eq!(ym.month(), 1);
        assert_eq!(ym.to_string(), "2023-01");
    }

    #[test]
    fn test_parse_ignores_trailing_characters() {
        let ym: YearMonth = "2022-11-30 00:00:00".parse().unwrap();
        assert_eq!(ym, YearMonth::new(2022, 11).unwrap());
    }

    #[test]
    fn test_parse_accepts_any_separator() {
        // Only the fixed offsets matter
        assert_eq!(
            YearMonth::parse("2021/07").unwrap(),
            YearMonth::new(2021, 7).unwrap()
        );
    }

    #[test]
    fn test_malformed_labels() {
        for label in ["", "2023", "2023-1", "23-01-01", "abcd-01", "2023-ab", "2023-13", "2023-00"] {
            let err = YearMonth::parse(label).unwrap_err();
            assert_eq!(
                err,
                VintageError::MalformedCohortLabel { label: label.to_string() },
                "label {:?} should be rejected",
                label
            );
        }
    }

    #[test]
    fn test_multibyte_label_does_not_panic() {
        assert!(YearMonth::parse("2023é01").is_err());
    }

    #[test]
    fn test_ordering_is_chronological() {
        let a = YearMonth::new(2022, 12).unwrap();
        let b = YearMonth::new(2023, 1).unwrap();
        assert!(a < b);
    }
}
