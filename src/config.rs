//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::chart::{ChartOptions, MissingPolicy, DEFAULT_CHART_HEIGHT, DEFAULT_Y_AXIS_LABEL};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub chart: ChartConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Source dataset configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./gdp_pcap.csv")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins, empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8050
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Chart rendering and widget defaults
#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_y_axis_label")]
    pub y_axis_label: String,

    #[serde(default = "default_chart_height")]
    pub height: u32,

    /// Countries selected when the page first loads
    #[serde(default = "default_countries")]
    pub default_countries: Vec<String>,

    /// Distance in years between labelled slider marks
    #[serde(default = "default_mark_interval")]
    pub mark_interval: u32,

    #[serde(default)]
    pub missing_values: MissingPolicy,
}

fn default_y_axis_label() -> String {
    DEFAULT_Y_AXIS_LABEL.to_string()
}

fn default_chart_height() -> u32 {
    DEFAULT_CHART_HEIGHT
}

fn default_countries() -> Vec<String> {
    vec!["USA".to_string()]
}

fn default_mark_interval() -> u32 {
    100
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            y_axis_label: default_y_axis_label(),
            height: default_chart_height(),
            default_countries: default_countries(),
            mark_interval: default_mark_interval(),
            missing_values: MissingPolicy::default(),
        }
    }
}

impl ChartConfig {
    /// Presentation options for the render pipeline
    pub fn options(&self) -> ChartOptions {
        ChartOptions {
            y_axis_label: self.y_axis_label.clone(),
            height: self.height,
            missing_values: self.missing_values,
        }
    }
}

/// Static page layout configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_description")]
    pub description: String,

    #[serde(default = "default_stylesheet")]
    pub stylesheet: String,
}

fn default_title() -> String {
    "GDP Per Capita".to_string()
}

fn default_description() -> String {
    "Explore GDP per capita across countries and years with this interactive app. \
     Gapminder's dataset provides estimates of Gross Domestic Product per capita \
     for every country from 1800 to 2100. \
     Select one or more countries and a range of years to plot GDP per capita over time."
        .to_string()
}

fn default_stylesheet() -> String {
    "https://codepen.io/chriddyp/pen/bWLwgP.css".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: default_description(),
            stylesheet: default_stylesheet(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Whether structured JSON output was requested
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Standard config file locations, most specific first
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("gapminder-dash").join("config.toml")),
            Some(PathBuf::from("/etc/gapminder-dash/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Load from default locations or environment
    ///
    /// Returns the config and the file it came from, if any.
    pub fn load_default() -> Result<(Self, Option<PathBuf>), ConfigError> {
        Self::load_first(&Self::default_paths())
    }

    /// Load the first existing file of `paths`, with environment overrides
    ///
    /// A file that exists but cannot be read or parsed is an error; it is
    /// never skipped in favour of a later location or the defaults.
    pub fn load_first(paths: &[PathBuf]) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => {
                let config = Self::load_with_env(path)?;
                Ok((config, Some(path.clone())))
            }
            None => Ok((Self::from_env(), None)),
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("GAPMINDER_DATA_PATH") {
            self.data.path = PathBuf::from(path);
        }

        if let Ok(host) = std::env::var("GAPMINDER_API_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("GAPMINDER_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        if let Ok(level) = std::env::var("GAPMINDER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("GAPMINDER_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Gapminder Dash Configuration
#
# Environment variables override these settings:
# - GAPMINDER_DATA_PATH
# - GAPMINDER_API_HOST
# - GAPMINDER_API_PORT
# - GAPMINDER_LOG_LEVEL
# - GAPMINDER_LOG_FORMAT

[data]
# Wide CSV: a "country" column plus one column per year
path = "./gdp_pcap.csv"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8050

# Allowed CORS origins (empty = any)
cors_origins = []

[chart]
# Y-axis label
y_axis_label = "GDP per Capita"

# Chart height in pixels
height = 550

# Countries selected on first load
default_countries = ["USA"]

# Years between labelled slider marks
mark_interval = 100

# Years with no value: "zero" plots 0.0, "gap" breaks the line
missing_values = "zero"

[dashboard]
# Page heading
title = "GDP Per Capita"

# External stylesheet
stylesheet = "https://codepen.io/chriddyp/pen/bWLwgP.css"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.data.path, PathBuf::from("./gdp_pcap.csv"));
        assert_eq!(config.api.addr(), "0.0.0.0:8050");
        assert_eq!(config.chart.default_countries, vec!["USA"]);
        assert_eq!(config.chart.mark_interval, 100);
        assert_eq!(config.chart.options(), ChartOptions::default());
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.api.port, 8050);
        assert_eq!(config.chart.height, 550);
        assert_eq!(config.chart.missing_values, MissingPolicy::Zero);
        assert_eq!(config.dashboard.title, "GDP Per Capita");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::parse(
            r#"
[chart]
missing_values = "gap"
default_countries = ["France", "Chad"]

[logging]
format = "json"
"#,
        )
        .unwrap();

        assert_eq!(config.chart.missing_values, MissingPolicy::Gap);
        assert_eq!(config.chart.default_countries, vec!["France", "Chad"]);
        assert_eq!(config.chart.y_axis_label, "GDP per Capita");
        assert_eq!(config.api.port, 8050);
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_load_first_picks_first_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("config.toml");
        std::fs::write(&present, "[chart]\nheight = 400\n").unwrap();

        let paths = vec![dir.path().join("absent.toml"), present.clone()];
        let (config, source) = Config::load_first(&paths).unwrap();

        assert_eq!(source, Some(present));
        assert_eq!(config.chart.height, 400);
    }

    #[test]
    fn test_load_first_without_files_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, source) = Config::load_first(&[dir.path().join("absent.toml")]).unwrap();

        assert_eq!(source, None);
        assert_eq!(config.chart.height, 550);
    }

    #[test]
    fn test_load_first_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("config.toml");
        std::fs::write(
            &broken,
            "[data]\npath = \"/srv/real.csv\"\n\n[api]\nport = \"oops\"\n",
        )
        .unwrap();
        let fallback = dir.path().join("fallback.toml");
        std::fs::write(&fallback, "[api]\nport = 9000\n").unwrap();

        let err = Config::load_first(&[broken.clone(), fallback]).unwrap_err();
        match err {
            ConfigError::Parse { path, .. } => assert_eq!(path, broken),
            other => panic!("expected parse error, got {other}"),
        }
    }

    #[test]
    fn test_load_reports_path_on_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[api]\nport = \"not a port\"").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let err = Config::load(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
