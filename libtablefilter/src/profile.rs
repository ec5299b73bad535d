//! Per-column statistics gathered once at initialization.
use derive_more::Display;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::config::FilterConfig;
use crate::extract::extract;
use crate::surface::{CellContent, TableSource};

/// Which control a column is filtered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum FilterStrategy {
    /// Few, short values: pick one from a list.
    #[display("selection")]
    Enumerable,
    /// Many or long values: type a substring.
    #[display("free-text")]
    FreeText,
}

impl FilterStrategy {
    /// Free text once there are more than `max_distinct_values` values or one
    /// of them is longer than `max_value_length`.
    #[must_use]
    pub fn decide(distinct_values: usize, max_value_length: usize, config: &FilterConfig) -> Self {
        if distinct_values > config.max_distinct_values
            || max_value_length > config.max_value_length
        {
            FilterStrategy::FreeText
        } else {
            FilterStrategy::Enumerable
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub column_index: usize,
    /// Distinct atomic values in first-seen order.
    pub distinct_values: IndexSet<String>,
    /// Length in characters of the longest distinct value.
    pub max_value_length: usize,
    pub strategy: FilterStrategy,
    /// False when the column has too few distinct values to be worth a control.
    pub filterable: bool,
}

impl ColumnProfile {
    pub fn build<I>(column_index: usize, cells: I, config: &FilterConfig) -> Self
    where
        I: IntoIterator<Item = CellContent>,
    {
        let mut distinct_values = IndexSet::new();
        let mut max_value_length = 0;

        for cell in cells {
            for value in extract(&cell, &config.separator_pattern) {
                let length = value.chars().count();
                if distinct_values.insert(value) {
                    max_value_length = max_value_length.max(length);
                }
            }
        }

        let strategy = FilterStrategy::decide(distinct_values.len(), max_value_length, config);
        let filterable = distinct_values.len() > config.min_distinct_values;

        Self {
            column_index,
            distinct_values,
            max_value_length,
            strategy,
            filterable,
        }
    }

    /// Profiles `column_index` of every body row. Rows without that cell are skipped.
    pub fn from_source<S>(source: &S, column_index: usize, config: &FilterConfig) -> Self
    where
        S: TableSource + ?Sized,
    {
        Self::build(
            column_index,
            (0..source.row_count()).filter_map(|row| source.cell(row, column_index)),
            config,
        )
    }

    #[must_use]
    pub fn distinct_count(&self) -> usize {
        self.distinct_values.len()
    }
}
