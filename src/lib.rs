//! # Gapminder Dash
//!
//! GDP per Capita Explorer - an interactive dashboard over the Gapminder
//! GDP per capita dataset.
//!
//! ## Modules
//!
//! - [`dataset`]: Loads the wide CSV and reshapes it into a tidy table
//! - [`chart`]: Filter-aggregate-render pipeline producing chart descriptions
//! - [`api`]: HTTP server with Axum (dashboard page, JSON endpoints, probes)
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust
//! use gapminder_dash::{render, ChartOptions, Selection, TidyTable};
//!
//! let table = TidyTable::from_csv_str("country,2000,2001\nUSA,10,12\nFrance,8,").unwrap();
//! assert_eq!(table.year_bounds(), Some((2000, 2001)));
//!
//! let chart = render(
//!     &Selection::new(["USA", "France"], (2000, 2001)),
//!     &table,
//!     &ChartOptions::default(),
//! );
//! assert_eq!(chart.series.len(), 2);
//! ```

pub mod api;
pub mod chart;
pub mod config;
pub mod dataset;

// Re-export top-level types for convenience
pub use dataset::{DatasetError, DatasetResult, TidyRecord, TidyTable, WideRecord, YearRange};

pub use chart::{
    render, ChartDescription, ChartOptions, ChartPoint, ChartSeries, MissingPolicy, Selection,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{
    ApiConfig, ChartConfig, Config, ConfigError, DashboardConfig, DataConfig, LoggingConfig,
};
