//! Options Routes
//!
//! - GET /api/v1/options - Values for the country dropdown and year slider

use axum::{extract::State, Json};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::dto::OptionsResponse;
use crate::api::state::AppState;
use crate::dataset::YearRange;

/// GET /api/v1/options
pub async fn get_options(State(state): State<Arc<AppState>>) -> Json<OptionsResponse> {
    let table = &state.table;
    let bounds = table.year_bounds();

    let countries: Vec<String> = table.countries().into_iter().map(str::to_string).collect();

    // Only preselect countries that actually exist
    let default_countries = state
        .chart
        .default_countries
        .iter()
        .filter(|c| table.has_country(c))
        .cloned()
        .collect();

    let marks = bounds
        .map(|(min, max)| slider_marks(min, max, state.chart.mark_interval))
        .unwrap_or_default();

    Json(OptionsResponse {
        countries,
        year_min: bounds.map(|(min, _)| min),
        year_max: bounds.map(|(_, max)| max),
        step: 1,
        marks,
        default_countries,
        default_range: bounds.map(YearRange::from),
    })
}

/// Upper bound on the number of slider marks
pub const MAX_SLIDER_MARKS: usize = 50;

/// Labelled marks every `interval` years starting at `min`
///
/// The interval widens when the span would need more than
/// [`MAX_SLIDER_MARKS`] marks.
pub fn slider_marks(min: i32, max: i32, interval: u32) -> BTreeMap<i32, String> {
    if min > max {
        return BTreeMap::new();
    }

    let span = i64::from(max) - i64::from(min);
    let mut step = i64::from(interval.max(1));
    if span / step + 1 > MAX_SLIDER_MARKS as i64 {
        let slots = MAX_SLIDER_MARKS as i64 - 1;
        step = (span + slots - 1) / slots;
    }

    (0..=span / step)
        .map(|i| i64::from(min) + i * step)
        .filter_map(|year| i32::try_from(year).ok())
        .map(|year| (year, year.to_string()))
        .collect()
}
