//! Splitting cell content into atomic values.
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use crate::error::TableFilterError;
use crate::surface::CellContent;

/// Matches the common spellings of a markup line break.
pub const DEFAULT_SEPARATOR_PATTERN: &str = "<br>|<br />|<br/>|<BR>";

/// Pattern separating several values stored in one cell.
///
/// An empty pattern never splits.
#[derive(Debug, Clone)]
pub struct SeparatorPattern {
    source: String,
    regex: Option<Regex>,
}

impl SeparatorPattern {
    pub fn new(pattern: &str) -> Result<Self, TableFilterError> {
        let regex = if pattern.is_empty() {
            None
        } else {
            Some(
                Regex::new(pattern).map_err(|source| TableFilterError::InvalidSeparator {
                    pattern: pattern.to_string(),
                    source,
                })?,
            )
        };
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Like [`SeparatorPattern::new`], but an invalid pattern degrades to "never split".
    pub fn lenient(pattern: &str) -> Self {
        Self::new(pattern).unwrap_or_else(|err| {
            warn!("{err}, cell values will not be split");
            Self::never()
        })
    }

    /// A pattern that keeps every cell as a single value.
    #[must_use]
    pub fn never() -> Self {
        Self {
            source: String::new(),
            regex: None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn split<'t>(&self, text: &'t str) -> Vec<&'t str> {
        match &self.regex {
            Some(regex) => regex.split(text).collect(),
            None => vec![text],
        }
    }
}

impl Default for SeparatorPattern {
    fn default() -> Self {
        Self::lenient(DEFAULT_SEPARATOR_PATTERN)
    }
}

impl PartialEq for SeparatorPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for SeparatorPattern {}

impl Serialize for SeparatorPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for SeparatorPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pattern = String::deserialize(deserializer)?;
        Ok(Self::lenient(&pattern))
    }
}

/// Extracts the trimmed atomic values of a cell.
///
/// Always yields at least one value; an empty cell yields a single empty string.
pub fn extract(cell: &CellContent, separator: &SeparatorPattern) -> Vec<String> {
    separator
        .split(cell.source_text().trim())
        .into_iter()
        .map(|piece| piece.trim().to_string())
        .collect()
}

/// A cell ready for filter evaluation.
///
/// Free-text filters look at `raw`, selection filters at `values`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedCell {
    pub raw: String,
    pub values: Vec<String>,
}

impl ExtractedCell {
    pub fn from_content(cell: &CellContent, separator: &SeparatorPattern) -> Self {
        Self {
            raw: cell.markup.clone(),
            values: extract(cell, separator),
        }
    }

    /// Builds a cell from already extracted values, joining them with `<br>` for the raw text.
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        Self {
            raw: values.join("<br>"),
            values,
        }
    }
}
