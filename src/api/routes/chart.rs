//! Chart Routes
//!
//! Endpoints that run the filter-aggregate-render pipeline.
//!
//! - GET /api/v1/chart - Selection from the query string
//! - POST /api/v1/chart - Selection as a JSON body

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{ChartParams, ChartResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::chart::{render, Selection};

/// GET /api/v1/chart?countries=USA,France&start=2000&end=2010
///
/// Missing bounds default to the dataset's year span.
pub async fn get_chart(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ChartParams>,
) -> ApiResult<Json<ChartResponse>> {
    let selection = params.into_selection(state.table.year_bounds())?;
    Ok(Json(render_selection(&state, &selection)))
}

/// POST /api/v1/chart
///
/// Body: `{"countries": ["USA"], "year_range": [2000, 2010]}`
pub async fn post_chart(
    State(state): State<Arc<AppState>>,
    Json(selection): Json<Selection>,
) -> ApiResult<Json<ChartResponse>> {
    Ok(Json(render_selection(&state, &selection)))
}

fn render_selection(state: &AppState, selection: &Selection) -> ChartResponse {
    let unknown: Vec<&str> = selection
        .countries
        .iter()
        .map(String::as_str)
        .filter(|c| !state.table.has_country(c))
        .collect();
    if !unknown.is_empty() {
        tracing::debug!(?unknown, "Selection names countries absent from the dataset");
    }

    render(selection, &state.table, &state.chart_options()).into()
}
