//! Load vintage matrices from delimited text
//!
//! Expected layout (semicolon separated, Spanish-style percentages accepted):
//!
//! ```text
//! cohorte;2023-01;2023-02;2023-03
//! 2023-01;0,50%;1,00%;1,50%
//! 2023-02;;0,40%;0,90%
//! ```
//!
//! The first column holds cohort labels; its header is ignored. Empty cells are
//! absent observations.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use log::debug;
use thiserror::Error;

use super::matrix::ObservationMatrix;
use crate::error::VintageError;

/// Default field delimiter
pub const DEFAULT_DELIMITER: u8 = b';';

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid value {value:?} for cohort {cohort} at column {column}")]
    InvalidValue {
        cohort: String,
        column: usize,
        value: String,
    },

    #[error(transparent)]
    Matrix(#[from] VintageError),
}

/// Parse a percentage cell such as `"1,25%"`, `"1.25"` or `""`.
///
/// Returns `Ok(None)` for empty and `NaN` cells.
pub fn parse_percent(raw: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }

    let normalized = trimmed.replace('%', "").replace(',', ".");
    let value: f64 = normalized.trim().parse()?;
    Ok((!value.is_nan()).then_some(value))
}

/// Load a matrix from a file using the default delimiter
pub fn load_matrix<P: AsRef<Path>>(path: P) -> Result<ObservationMatrix, LoadError> {
    let file = File::open(path)?;
    load_matrix_from_reader(file, DEFAULT_DELIMITER)
}

/// Load a matrix from any reader (string buffer, upload body, ...)
pub fn load_matrix_from_reader<R: Read>(
    reader: R,
    delimiter: u8,
) -> Result<ObservationMatrix, LoadError> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let periods: Vec<String> = csv_reader
        .headers()?
        .iter()
        .skip(1)
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let Some(cohort) = record.get(0) else { continue };
        let cohort = cohort.trim_start_matches('\u{feff}').to_string();

        let mut cells = Vec::with_capacity(periods.len());
        for (column, raw) in record.iter().enumerate().skip(1) {
            let value = parse_percent(raw).map_err(|_| LoadError::InvalidValue {
                cohort: cohort.clone(),
                column,
                value: raw.to_string(),
            })?;
            cells.push(value);
        }

        // Short rows are missing trailing observations
        if cells.len() < periods.len() {
            cells.resize(periods.len(), None);
        }

        rows.push((cohort, cells));
    }

    debug!("Loaded {} cohort rows x {} periods", rows.len(), periods.len());

    Ok(ObservationMatrix::from_rows(periods, rows)?)
}
