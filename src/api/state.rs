//! Application State
//!
//! Shared state accessible by all API handlers.
//! The tidy table is loaded before the server starts and only ever read
//! afterwards, so handlers share it through an `Arc` without locking.

use std::sync::Arc;
use std::time::Instant;

use crate::chart::ChartOptions;
use crate::config::{ApiConfig, ChartConfig, Config, DashboardConfig};
use crate::dataset::TidyTable;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Immutable long-format dataset
    pub table: Arc<TidyTable>,
    /// API configuration
    pub api: Arc<ApiConfig>,
    /// Chart and widget defaults
    pub chart: Arc<ChartConfig>,
    /// Static page layout
    pub dashboard: Arc<DashboardConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState with default chart and page settings
    pub fn new(table: Arc<TidyTable>, api: ApiConfig) -> Self {
        Self {
            table,
            api: Arc::new(api),
            chart: Arc::new(ChartConfig::default()),
            dashboard: Arc::new(DashboardConfig::default()),
            start_time: Instant::now(),
        }
    }

    /// Create AppState from a full configuration
    pub fn from_config(table: Arc<TidyTable>, config: &Config) -> Self {
        Self {
            table,
            api: Arc::new(config.api.clone()),
            chart: Arc::new(config.chart.clone()),
            dashboard: Arc::new(config.dashboard.clone()),
            start_time: Instant::now(),
        }
    }

    /// Replace the chart settings
    pub fn with_chart_config(mut self, chart: ChartConfig) -> Self {
        self.chart = Arc::new(chart);
        self
    }

    /// Render options derived from the chart settings
    pub fn chart_options(&self) -> ChartOptions {
        self.chart.options()
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
