use crate::filter::FilterId;
use crate::profile::FilterStrategy;

/// Errors raised at the boundary of the library.
///
/// Evaluation itself never fails; these only report misuse of the API or
/// unreadable configuration.
#[derive(Debug, thiserror::Error)]
pub enum TableFilterError {
    /// No filter with this id exists for the current initialization.
    #[error("unknown {0}")]
    UnknownFilter(FilterId),

    /// A selection was sent to a free-text filter, or a pattern to a selection filter.
    #[error("{id} is a {actual} filter and cannot take this change")]
    StrategyMismatch { id: FilterId, actual: FilterStrategy },

    #[error("invalid separator pattern '{pattern}': {source}")]
    InvalidSeparator {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),
}
