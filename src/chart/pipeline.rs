//! Filter-aggregate-render pipeline
//!
//! ```text
//! TidyTable ──filter(selection)──▶ records ──aggregate──▶ rows ──render──▶ ChartDescription
//! ```
//!
//! Every step is a pure function of its inputs. Calling [`render`] twice
//! with the same selection and table yields identical descriptions.

use std::collections::BTreeMap;

use super::types::{
    AggregateRow, ChartDescription, ChartOptions, ChartPoint, ChartSeries, MissingPolicy,
    Selection, PALETTE, X_AXIS_LABEL,
};
use crate::dataset::{TidyRecord, TidyTable, YearRange};

/// Keep records inside the year range whose country is selected
pub fn filter<'a>(table: &'a TidyTable, selection: &Selection) -> Vec<&'a TidyRecord> {
    if selection.countries.is_empty() || selection.year_range.is_empty() {
        return Vec::new();
    }

    table
        .iter()
        .filter(|r| selection.year_range.contains(r.year) && selection.includes(&r.country))
        .collect()
}

/// Sum values per (year, country)
///
/// Rows come back ordered by year, then country. Missing values are left
/// out of the sum; a group with nothing but missing values follows `policy`.
pub fn aggregate<'a, I>(records: I, policy: MissingPolicy) -> Vec<AggregateRow>
where
    I: IntoIterator<Item = &'a TidyRecord>,
{
    let mut groups: BTreeMap<(i32, &str), Option<f64>> = BTreeMap::new();

    for record in records {
        let slot = groups.entry((record.year, record.country.as_str())).or_default();
        if let Some(value) = record.gdp_per_capita {
            *slot = Some(slot.unwrap_or(0.0) + value);
        }
    }

    groups
        .into_iter()
        .map(|((year, country), sum)| AggregateRow {
            year,
            country: country.to_string(),
            value: match policy {
                MissingPolicy::Zero => Some(sum.unwrap_or(0.0)),
                MissingPolicy::Gap => sum,
            },
        })
        .collect()
}

/// Chart title for a selection
pub fn chart_title(selection: &Selection) -> String {
    let YearRange { start, end } = selection.year_range;
    if selection.countries.is_empty() {
        return format!("GDP per Capita from {} to {} (no countries selected)", start, end);
    }

    format!(
        "GDP per Capita for {} from {} to {}",
        selection.countries.join(", "),
        start,
        end
    )
}

/// Build the chart description for a selection
pub fn render(
    selection: &Selection,
    table: &TidyTable,
    options: &ChartOptions,
) -> ChartDescription {
    let filtered = filter(table, selection);
    let rows = aggregate(filtered, options.missing_values);

    // Rows are year-ordered, so each series' points stay sorted
    let mut by_country: BTreeMap<String, Vec<ChartPoint>> = BTreeMap::new();
    for row in rows {
        by_country.entry(row.country).or_default().push(ChartPoint {
            year: row.year,
            value: row.value,
        });
    }

    let series: Vec<ChartSeries> = by_country
        .into_iter()
        .enumerate()
        .map(|(idx, (name, points))| ChartSeries {
            name,
            color: PALETTE[idx % PALETTE.len()].to_string(),
            points,
        })
        .collect();

    tracing::debug!(
        countries = selection.countries.len(),
        range = %selection.year_range,
        series = series.len(),
        "Rendered chart"
    );

    ChartDescription {
        title: chart_title(selection),
        x_axis_label: X_AXIS_LABEL.to_string(),
        y_axis_label: options.y_axis_label.clone(),
        height: options.height,
        series,
    }
}
