//! Chart pipeline types
//!
//! `Selection` is the input of a single render, `ChartDescription` its
//! output. Both are plain data so that any rendering front end (the
//! dashboard page, the CLI) can consume them.

use serde::{Deserialize, Serialize};

use crate::dataset::YearRange;

/// X-axis label of every chart
pub const X_AXIS_LABEL: &str = "Year";

/// Default y-axis label
pub const DEFAULT_Y_AXIS_LABEL: &str = "GDP per Capita";

/// Default chart height in pixels
pub const DEFAULT_CHART_HEIGHT: u32 = 550;

/// Qualitative palette, one color per series
pub const PALETTE: [&str; 10] = [
    "#636efa", "#ef553b", "#00cc96", "#ab63fa", "#ffa15a", "#19d3f3", "#ff6692", "#b6e880",
    "#ff97ff", "#fecb52",
];

/// User-chosen filter parameters for one render
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Selection {
    /// Countries to plot; an empty list plots nothing
    #[serde(default)]
    pub countries: Vec<String>,
    /// Closed year interval
    pub year_range: YearRange,
}

impl Selection {
    /// Create a new selection
    pub fn new<I, S>(countries: I, year_range: impl Into<YearRange>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            countries: countries.into_iter().map(Into::into).collect(),
            year_range: year_range.into(),
        }
    }

    /// Check if a country is part of the selection
    pub fn includes(&self, country: &str) -> bool {
        self.countries.iter().any(|c| c == country)
    }
}

/// How a (year, country) group with only missing values is reported
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Missing values count as zero, an all-missing group plots at 0.0
    #[default]
    Zero,
    /// An all-missing group stays missing and breaks the line
    Gap,
}

/// Presentation settings applied to every render
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub y_axis_label: String,
    pub height: u32,
    pub missing_values: MissingPolicy,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            y_axis_label: DEFAULT_Y_AXIS_LABEL.to_string(),
            height: DEFAULT_CHART_HEIGHT,
            missing_values: MissingPolicy::default(),
        }
    }
}

/// One aggregated (year, country) value
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub year: i32,
    pub country: String,
    pub value: Option<f64>,
}

/// A single point of a series
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ChartPoint {
    pub year: i32,
    pub value: Option<f64>,
}

/// One line of the chart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartSeries {
    /// Country name
    pub name: String,
    /// Line color
    pub color: String,
    /// Points sorted by year ascending
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    /// Years of this series
    pub fn years(&self) -> Vec<i32> {
        self.points.iter().map(|p| p.year).collect()
    }

    /// Value for a given year, if the series has a point there
    pub fn value_at(&self, year: i32) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.year == year)
            .and_then(|p| p.value)
    }
}

/// Everything a front end needs to draw the line chart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartDescription {
    pub title: String,
    pub x_axis_label: String,
    pub y_axis_label: String,
    pub height: u32,
    pub series: Vec<ChartSeries>,
}

impl ChartDescription {
    /// True when no series survived filtering
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Find a series by country name
    pub fn series(&self, name: &str) -> Option<&ChartSeries> {
        self.series.iter().find(|s| s.name == name)
    }

    /// Total number of points across all series
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_deserializes_from_json() {
        let selection: Selection =
            serde_json::from_str(r#"{"countries": ["USA", "France"], "year_range": [1990, 2000]}"#)
                .unwrap();

        assert_eq!(selection, Selection::new(["USA", "France"], (1990, 2000)));
        assert!(selection.includes("France"));
        assert!(!selection.includes("Germany"));
    }

    #[test]
    fn test_selection_countries_default_to_empty() {
        let selection: Selection = serde_json::from_str(r#"{"year_range": [1990, 2000]}"#).unwrap();
        assert!(selection.countries.is_empty());
    }

    #[test]
    fn test_missing_policy_names() {
        assert_eq!(serde_json::to_string(&MissingPolicy::Gap).unwrap(), "\"gap\"");
        let policy: MissingPolicy = serde_json::from_str("\"zero\"").unwrap();
        assert_eq!(policy, MissingPolicy::Zero);
    }

    #[test]
    fn test_palette_colors_are_distinct() {
        let mut colors = PALETTE.to_vec();
        colors.sort_unstable();
        colors.dedup();
        assert_eq!(colors.len(), PALETTE.len());
    }
}
