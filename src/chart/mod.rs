//! Chart pipeline
//!
//! Turns a user selection into a line chart description:
//!
//! - **types**: `Selection`, `ChartDescription` and friends
//! - **pipeline**: filter, aggregate and render steps
//!
//! # Example
//!
//! ```rust
//! use gapminder_dash::chart::{render, ChartOptions, Selection};
//! use gapminder_dash::dataset::TidyTable;
//!
//! let table = TidyTable::from_csv_str("country,2000,2001\nUSA,10,12\nFrance,8,9").unwrap();
//! let selection = Selection::new(["USA"], (2000, 2001));
//! let chart = render(&selection, &table, &ChartOptions::default());
//!
//! assert_eq!(chart.series.len(), 1);
//! assert_eq!(chart.series[0].points.len(), 2);
//! ```

pub mod pipeline;
pub mod types;

pub use pipeline::{aggregate, chart_title, filter, render};
pub use types::{
    AggregateRow, ChartDescription, ChartOptions, ChartPoint, ChartSeries, MissingPolicy,
    Selection, DEFAULT_CHART_HEIGHT, DEFAULT_Y_AXIS_LABEL, PALETTE, X_AXIS_LABEL,
};
