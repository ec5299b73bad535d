//! Configuration of the table filters.
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::TableFilterError;
use crate::extract::SeparatorPattern;

pub const DEFAULT_HEADER_SELECTOR: &str = "thead th";
pub const DEFAULT_FILTER_ROW_MARKER: &str = "filterRow";
pub const DEFAULT_ACTIVE_MARKER_CLASS: &str = "activeFilter";
pub const DEFAULT_NO_FILTER_MARKER: &str = "noFilter";
pub const DEFAULT_ROW_MARKER_PREFIX: &str = "filter";
/// Values longer than this switch a column to a free-text control.
pub const DEFAULT_MAX_VALUE_LENGTH: usize = 35;
/// More distinct values than this switch a column to a free-text control.
pub const DEFAULT_MAX_DISTINCT_VALUES: usize = 20;
/// Columns with at most this many distinct values get no control at all.
pub const DEFAULT_MIN_DISTINCT_VALUES: usize = 4;
/// Quiet period before a free-text change is evaluated.
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

const ENV_PREFIX: &str = "TABLEFILTER";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Selector handed to the surface to find the header cells.
    pub header_selector: String,
    /// Marker class of the injected filter row.
    pub filter_row_marker: String,
    /// Class put on a control while its filter restricts the rows.
    pub active_marker_class: String,
    /// Header class that opts a column out of filtering.
    pub no_filter_marker: String,
    /// Prefix of the per-filter row markers (`filter0`, `filter1`, ...).
    pub row_marker_prefix: String,
    pub max_value_length: usize,
    pub max_distinct_values: usize,
    pub min_distinct_values: usize,
    /// Separates several values stored in one cell.
    pub separator_pattern: SeparatorPattern,
    pub debounce_ms: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            header_selector: DEFAULT_HEADER_SELECTOR.to_string(),
            filter_row_marker: DEFAULT_FILTER_ROW_MARKER.to_string(),
            active_marker_class: DEFAULT_ACTIVE_MARKER_CLASS.to_string(),
            no_filter_marker: DEFAULT_NO_FILTER_MARKER.to_string(),
            row_marker_prefix: DEFAULT_ROW_MARKER_PREFIX.to_string(),
            max_value_length: DEFAULT_MAX_VALUE_LENGTH,
            max_distinct_values: DEFAULT_MAX_DISTINCT_VALUES,
            min_distinct_values: DEFAULT_MIN_DISTINCT_VALUES,
            separator_pattern: SeparatorPattern::default(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl FilterConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the configuration from defaults, an optional TOML file and
    /// `TABLEFILTER_*` environment variables, later sources winning.
    pub fn load(path: Option<&Path>) -> Result<Self, TableFilterError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        Ok(builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?)
    }

    pub fn from_toml(config: &str) -> Result<Self, TableFilterError> {
        Ok(toml::from_str(config)?)
    }

    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub fn with_header_selector(mut self, selector: impl Into<String>) -> Self {
        self.header_selector = selector.into();
        self
    }

    #[must_use]
    pub fn with_filter_row_marker(mut self, marker: impl Into<String>) -> Self {
        self.filter_row_marker = marker.into();
        self
    }

    #[must_use]
    pub fn with_active_marker_class(mut self, class: impl Into<String>) -> Self {
        self.active_marker_class = class.into();
        self
    }

    #[must_use]
    pub fn with_max_value_length(mut self, length: usize) -> Self {
        self.max_value_length = length;
        self
    }

    #[must_use]
    pub fn with_max_distinct_values(mut self, count: usize) -> Self {
        self.max_distinct_values = count;
        self
    }

    #[must_use]
    pub fn with_min_distinct_values(mut self, count: usize) -> Self {
        self.min_distinct_values = count;
        self
    }

    #[must_use]
    pub fn with_separator_pattern(mut self, pattern: SeparatorPattern) -> Self {
        self.separator_pattern = pattern;
        self
    }

    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce_ms = u64::try_from(debounce.as_millis()).unwrap_or(u64::MAX);
        self
    }
}
