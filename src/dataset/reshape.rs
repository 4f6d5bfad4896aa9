//! Wide-to-tidy reshaping
//!
//! Reads the Gapminder wide layout (one row per country, one column per
//! year) and melts it into one record per (country, year) pair.
//!
//! ```text
//! country,1800,1801        country  year  gdp
//! USA,2.1k,2.2k      →     USA      1800  2100
//!                          USA      1801  2200
//! ```

use std::io::Read;

use super::error::{DatasetError, DatasetResult};
use super::types::{TidyRecord, WideRecord};

/// Header label identifying the country column
///
/// Without a header of this name the first column holds the country.
pub const COUNTRY_COLUMN: &str = "country";

/// The wide source table as read from disk
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideTable {
    /// Year of each value column, in header order
    pub years: Vec<i32>,
    /// One record per data row
    pub records: Vec<WideRecord>,
}

impl WideTable {
    /// Parse a wide table from delimited text with a header row
    pub fn from_reader<R: Read>(reader: R) -> DatasetResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(DatasetError::MissingHeader);
        }

        let country_idx = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(COUNTRY_COLUMN))
            .unwrap_or(0);

        // Every other column must be labelled with a year
        let mut year_columns = Vec::with_capacity(headers.len() - 1);
        for (idx, label) in headers.iter().enumerate() {
            if idx == country_idx {
                continue;
            }
            let year = label.parse::<i32>().map_err(|_| DatasetError::InvalidYear {
                index: idx,
                label: label.to_string(),
            })?;
            year_columns.push((idx, year));
        }

        let mut records = Vec::new();
        let mut seen = std::collections::HashSet::new();

        for (line_num, result) in reader.records().enumerate() {
            let record = result?;
            let line = line_num + 2;

            let country = match record.get(country_idx) {
                Some(c) if !c.is_empty() => c.to_string(),
                _ => {
                    tracing::warn!(line, "Skipping row without a country name");
                    continue;
                }
            };

            if !seen.insert(country.clone()) {
                tracing::warn!(line, country = %country, "Duplicate country row; values will be summed");
            }

            let values = year_columns
                .iter()
                .map(|(idx, _)| record.get(*idx).and_then(coerce_value))
                .collect();

            records.push(WideRecord { country, values });
        }

        Ok(Self {
            years: year_columns.into_iter().map(|(_, year)| year).collect(),
            records,
        })
    }

    /// Number of cells holding a numeric value
    pub fn present_cells(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.values.iter().filter(|v| v.is_some()).count())
            .sum()
    }
}

/// Melt a wide table into tidy records
///
/// Emits exactly one record per (country, year column) pair, country-major.
pub fn reshape(wide: &WideTable) -> Vec<TidyRecord> {
    let mut tidy = Vec::with_capacity(wide.records.len() * wide.years.len());

    for record in &wide.records {
        for (i, year) in wide.years.iter().enumerate() {
            let value = record.values.get(i).copied().flatten();
            tidy.push(TidyRecord::new(record.country.as_str(), *year, value));
        }
    }

    tidy
}

/// Coerce a raw cell to a number
///
/// Accepts plain decimals and Gapminder's magnitude suffixes
/// (`52k`, `1.5M`, `2B`). Anything else, including non-finite values,
/// is missing.
pub fn coerce_value(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let (last_idx, last) = s.char_indices().last()?;

    let (digits, multiplier) = match last.to_ascii_lowercase() {
        'k' => (&s[..last_idx], 1e3),
        'm' => (&s[..last_idx], 1e6),
        'b' => (&s[..last_idx], 1e9),
        _ => (s, 1.0),
    };

    let value = digits.trim().parse::<f64>().ok()? * multiplier;
    value.is_finite().then_some(value)
}
