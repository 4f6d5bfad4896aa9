//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::api::error::{ApiError, ApiResult};
use crate::chart::{ChartDescription, Selection};
use crate::dataset::YearRange;

// ============================================
// CHART DTOs
// ============================================

/// Query string of `GET /api/v1/chart`
#[derive(Debug, Default, Deserialize)]
pub struct ChartParams {
    /// Comma-separated country names, absent means no countries
    #[serde(default)]
    pub countries: Option<String>,
    /// First year, defaults to the earliest year of the dataset
    #[serde(default)]
    pub start: Option<i32>,
    /// Last year, defaults to the latest year of the dataset
    #[serde(default)]
    pub end: Option<i32>,
}

impl ChartParams {
    /// Resolve into a selection, filling missing bounds from the dataset
    pub fn into_selection(self, bounds: Option<(i32, i32)>) -> ApiResult<Selection> {
        let countries: Vec<String> = self
            .countries
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();

        let start = self.start.or(bounds.map(|(min, _)| min));
        let end = self.end.or(bounds.map(|(_, max)| max));

        match (start, end) {
            (Some(start), Some(end)) => Ok(Selection {
                countries,
                year_range: YearRange::new(start, end),
            }),
            _ => Err(ApiError::Validation(
                "start and end are required when the dataset has no years".to_string(),
            )),
        }
    }
}

/// Chart response: the description plus a summary
#[derive(Debug, Serialize)]
pub struct ChartResponse {
    #[serde(flatten)]
    pub chart: ChartDescription,
    pub meta: ChartMeta,
}

/// Chart summary
#[derive(Debug, Serialize)]
pub struct ChartMeta {
    /// Number of series drawn
    pub series_count: usize,
    /// Number of points across all series
    pub point_count: usize,
}

impl From<ChartDescription> for ChartResponse {
    fn from(chart: ChartDescription) -> Self {
        let meta = ChartMeta {
            series_count: chart.series.len(),
            point_count: chart.point_count(),
        };
        Self { chart, meta }
    }
}

// ============================================
// OPTIONS DTOs
// ============================================

/// Widget options for the dashboard page
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    /// Country dropdown entries, in dataset order
    pub countries: Vec<String>,
    /// Range slider bounds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_min: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_max: Option<i32>,
    /// Slider step in years
    pub step: u32,
    /// Labelled slider marks, keyed by year
    pub marks: BTreeMap<i32, String>,
    /// Initial dropdown value
    pub default_countries: Vec<String>,
    /// Initial slider value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_range: Option<YearRange>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded
    pub status: String,
    /// Number of tidy records held in memory
    pub records: usize,
    /// Number of distinct countries
    pub countries: usize,
    /// Year span of the dataset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years: Option<YearRange>,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_split_countries() {
        let params = ChartParams {
            countries: Some("USA, France,,Chad ".to_string()),
            start: Some(1990),
            end: Some(2000),
        };

        let selection = params.into_selection(Some((1800, 2100))).unwrap();
        assert_eq!(selection.countries, vec!["USA", "France", "Chad"]);
        assert_eq!(selection.year_range, YearRange::new(1990, 2000));
    }

    #[test]
    fn test_params_default_to_dataset_bounds() {
        let selection = ChartParams::default()
            .into_selection(Some((1800, 2100)))
            .unwrap();

        assert!(selection.countries.is_empty());
        assert_eq!(selection.year_range, YearRange::new(1800, 2100));
    }

    #[test]
    fn test_params_without_bounds_require_years() {
        let err = ChartParams::default().into_selection(None).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let params = ChartParams {
            start: Some(1),
            end: Some(2),
            ..Default::default()
        };
        assert!(params.into_selection(None).is_ok());
    }
}
