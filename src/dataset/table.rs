//! Tidy table
//!
//! The long-format dataset held in memory for the lifetime of the server.
//! Built once at startup and never mutated afterwards, so it can be shared
//! across request handlers behind an `Arc` without locking.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::error::{DatasetError, DatasetResult};
use super::reshape::{reshape, WideTable};
use super::types::TidyRecord;

/// Read-only collection of (country, year) observations
#[derive(Debug, Clone, Default)]
pub struct TidyTable {
    years: Vec<i32>,
    records: Vec<TidyRecord>,
}

impl TidyTable {
    /// Load and reshape a wide CSV file
    pub fn load(path: impl AsRef<Path>) -> DatasetResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DatasetError::Open {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let table = Self::from_reader(BufReader::new(file))?;

        tracing::info!(
            path = %path.display(),
            records = table.len(),
            countries = table.countries().len(),
            years = table.years.len(),
            "Dataset loaded"
        );

        Ok(table)
    }

    /// Parse and reshape a wide table from any reader
    pub fn from_reader<R: Read>(reader: R) -> DatasetResult<Self> {
        let wide = WideTable::from_reader(reader)?;

        let missing = wide.records.len() * wide.years.len() - wide.present_cells();
        if missing > 0 {
            tracing::debug!(missing, "Cells without a numeric value");
        }

        Ok(Self::from_wide(&wide))
    }

    /// Parse from a CSV string (useful for testing)
    pub fn from_csv_str(csv_data: &str) -> DatasetResult<Self> {
        Self::from_reader(csv_data.as_bytes())
    }

    /// Build from an already parsed wide table
    pub fn from_wide(wide: &WideTable) -> Self {
        Self {
            years: wide.years.clone(),
            records: reshape(wide),
        }
    }

    /// Build directly from tidy records
    pub fn from_records(records: Vec<TidyRecord>) -> Self {
        let mut years: Vec<i32> = records.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        Self { years, records }
    }

    /// All records, country-major
    pub fn records(&self) -> &[TidyRecord] {
        &self.records
    }

    /// Iterate over records
    pub fn iter(&self) -> std::slice::Iter<'_, TidyRecord> {
        self.records.iter()
    }

    /// Year columns in source order
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Global minimum and maximum year, `None` for a table without years
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let min = self.years.iter().min()?;
        let max = self.years.iter().max()?;
        Some((*min, *max))
    }

    /// Distinct country names in order of first appearance
    pub fn countries(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| r.country.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Check whether any record belongs to `country`
    pub fn has_country(&self, country: &str) -> bool {
        self.records.iter().any(|r| r.country == country)
    }
}

impl<'a> IntoIterator for &'a TidyTable {
    type Item = &'a TidyRecord;
    type IntoIter = std::slice::Iter<'a, TidyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "country,1998,1999,2000
Norway,40k,41k,43k
Chad,900,,1k
Norway,1,1,1";

    #[test]
    fn test_startup_queries() {
        let table = TidyTable::from_csv_str(SAMPLE).unwrap();

        assert_eq!(table.len(), 9);
        assert_eq!(table.years(), &[1998, 1999, 2000]);
        assert_eq!(table.year_bounds(), Some((1998, 2000)));
        assert_eq!(table.countries(), vec!["Norway", "Chad"]);
        assert!(table.has_country("Chad"));
        assert!(!table.has_country("Peru"));
    }

    #[test]
    fn test_year_bounds_ignore_column_order() {
        let table = TidyTable::from_csv_str("country,2010,1990,2000\nX,1,2,3").unwrap();
        assert_eq!(table.year_bounds(), Some((1990, 2010)));
    }

    #[test]
    fn test_empty_table() {
        let table = TidyTable::from_csv_str("country").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.year_bounds(), None);
        assert!(table.countries().is_empty());
    }

    #[test]
    fn test_from_records_derives_years() {
        let table = TidyTable::from_records(vec![
            TidyRecord::new("USA", 2001, Some(12.0)),
            TidyRecord::new("USA", 2000, Some(10.0)),
            TidyRecord::new("France", 2000, Some(8.0)),
        ]);
        assert_eq!(table.years(), &[2000, 2001]);
        assert_eq!(table.year_bounds(), Some((2000, 2001)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let table = TidyTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 9);
        assert_eq!(
            table.records()[0],
            TidyRecord::new("Norway", 1998, Some(40_000.0))
        );
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = TidyTable::load(dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::Open { .. }));
    }
}
