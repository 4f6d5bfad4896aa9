//! Core data types for the GDP per capita dataset
//!
//! - `WideRecord`: one country row of the source table
//! - `TidyRecord`: one (country, year) observation
//! - `YearRange`: a closed interval of years used for filtering

use serde::{Deserialize, Serialize};

/// One row of the wide source table
///
/// `values[i]` belongs to the i-th year column of the table the record
/// was read from; the year itself lives in the column header.
#[derive(Debug, Clone, PartialEq)]
pub struct WideRecord {
    /// Country name from the first column
    pub country: String,
    /// One value per year column, `None` when the cell was blank or not numeric
    pub values: Vec<Option<f64>>,
}

/// A single (country, year) observation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TidyRecord {
    pub country: String,
    pub year: i32,
    /// GDP per capita, `None` when the source cell was missing
    pub gdp_per_capita: Option<f64>,
}

impl TidyRecord {
    /// Create a new record
    pub fn new(country: impl Into<String>, year: i32, gdp_per_capita: Option<f64>) -> Self {
        Self {
            country: country.into(),
            year,
            gdp_per_capita,
        }
    }
}

/// A closed interval of years `[start, end]`
///
/// Serialized as a two-element array, matching the range slider value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    /// Create a new year range
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Range covering a single year
    pub fn single(year: i32) -> Self {
        Self::new(year, year)
    }

    /// Check if a year falls inside the range (both bounds inclusive)
    pub fn contains(&self, year: i32) -> bool {
        year >= self.start && year <= self.end
    }

    /// A range with `start > end` contains no year
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

impl From<(i32, i32)> for YearRange {
    fn from((start, end): (i32, i32)) -> Self {
        Self::new(start, end)
    }
}

impl From<YearRange> for (i32, i32) {
    fn from(range: YearRange) -> Self {
        (range.start, range.end)
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
