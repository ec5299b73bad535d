//! Composition of the per-column filters of one table.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::extract::{ExtractedCell, SeparatorPattern};
use crate::filter::{FilterId, FilterState};
use crate::profile::ColumnProfile;
use crate::surface::TableSource;

/// Extracted cells of one row, keyed by column index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowCells {
    cells: HashMap<usize, ExtractedCell>,
}

impl RowCells {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_cell(mut self, column_index: usize, cell: ExtractedCell) -> Self {
        self.cells.insert(column_index, cell);
        self
    }

    pub fn insert(&mut self, column_index: usize, cell: ExtractedCell) {
        self.cells.insert(column_index, cell);
    }

    #[must_use]
    pub fn cell(&self, column_index: usize) -> Option<&ExtractedCell> {
        self.cells.get(&column_index)
    }

    /// Reads and extracts the given columns of body row `row`.
    pub fn read<S, I>(source: &S, row: usize, columns: I, separator: &SeparatorPattern) -> Self
    where
        S: TableSource + ?Sized,
        I: IntoIterator<Item = usize>,
    {
        columns
            .into_iter()
            .filter_map(|column| {
                source
                    .cell(row, column)
                    .map(|cell| (column, ExtractedCell::from_content(&cell, separator)))
            })
            .collect()
    }
}

impl FromIterator<(usize, ExtractedCell)> for RowCells {
    fn from_iter<T: IntoIterator<Item = (usize, ExtractedCell)>>(iter: T) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Outcome of evaluating every filter against one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowDecision {
    pub row_index: usize,
    /// Filters rejecting the row, in column order.
    pub hidden_by: Vec<FilterId>,
}

impl RowDecision {
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.hidden_by.is_empty()
    }
}

/// The filters of one table, kept in column order.
#[derive(Debug, Default)]
pub struct FilterRegistry {
    filters: Vec<FilterState>,
}

impl FilterRegistry {
    pub fn new(filters: impl IntoIterator<Item = FilterState>) -> Self {
        let mut filters: Vec<FilterState> = filters.into_iter().collect();
        filters.sort_by_key(FilterState::column_index);
        Self { filters }
    }

    /// One filter per filterable profile.
    pub fn from_profiles<'a>(profiles: impl IntoIterator<Item = &'a ColumnProfile>) -> Self {
        Self::new(profiles.into_iter().filter_map(FilterState::from_profile))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterState> {
        self.filters.iter()
    }

    #[must_use]
    pub fn filter(&self, id: FilterId) -> Option<&FilterState> {
        self.filters.iter().find(|filter| filter.id() == id)
    }

    pub fn filter_mut(&mut self, id: FilterId) -> Option<&mut FilterState> {
        self.filters.iter_mut().find(|filter| filter.id() == id)
    }

    /// Column indices with a filter, ascending.
    pub fn columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.filters.iter().map(FilterState::column_index)
    }

    pub fn reset(&mut self) {
        self.filters.iter_mut().for_each(FilterState::reset);
    }

    /// A row is visible only if every filter accepts it. A row lacking the
    /// cell of a filter passes that filter.
    #[must_use]
    pub fn row_visible(&self, row: &RowCells) -> bool {
        self.filters.iter().all(|filter| {
            row.cell(filter.column_index())
                .is_none_or(|cell| filter.matches(cell))
        })
    }

    /// Like [`FilterRegistry::row_visible`], but lists every rejecting filter.
    #[must_use]
    pub fn decide(&self, row_index: usize, row: &RowCells) -> RowDecision {
        let hidden_by = self
            .filters
            .iter()
            .filter(|filter| {
                row.cell(filter.column_index())
                    .is_some_and(|cell| !filter.matches(cell))
            })
            .map(FilterState::id)
            .collect();
        RowDecision {
            row_index,
            hidden_by,
        }
    }

    /// Evaluates every body row of `source` against every filter.
    pub fn evaluate<S>(&self, source: &S, separator: &SeparatorPattern) -> Vec<RowDecision>
    where
        S: TableSource + ?Sized,
    {
        (0..source.row_count())
            .map(|row_index| {
                let row = RowCells::read(source, row_index, self.columns(), separator);
                self.decide(row_index, &row)
            })
            .collect()
    }
}
