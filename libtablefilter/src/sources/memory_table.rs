//! An in-memory table implementing both sides of the surface seam.
use std::collections::{BTreeSet, HashMap};

use tracing::warn;

use crate::filter::FilterId;
use crate::surface::{
    CellContent, FilterRow, HeaderCell, LifecycleEvent, RenderSurface, TableSource,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryRow {
    pub cells: Vec<CellContent>,
    pub classes: BTreeSet<String>,
    pub hidden: bool,
}

impl MemoryRow {
    pub fn new<I, C>(cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CellContent>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// A table held in memory. Records every injected filter row, control class
/// and lifecycle event so callers can inspect what the filters did.
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    headers: Option<Vec<HeaderCell>>,
    body: Option<Vec<MemoryRow>>,
    filter_rows: Vec<FilterRow>,
    control_classes: HashMap<FilterId, BTreeSet<String>>,
    events: Vec<LifecycleEvent>,
}

impl MemoryTable {
    /// A table with the given headers and an empty body.
    pub fn new(headers: impl IntoIterator<Item = HeaderCell>) -> Self {
        Self {
            headers: Some(headers.into_iter().collect()),
            body: Some(vec![]),
            ..Self::default()
        }
    }

    /// A table with only a body section.
    #[must_use]
    pub fn without_header(rows: Vec<MemoryRow>) -> Self {
        Self {
            body: Some(rows),
            ..Self::default()
        }
    }

    /// A table with only a header section.
    pub fn without_body(headers: impl IntoIterator<Item = HeaderCell>) -> Self {
        Self {
            headers: Some(headers.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn single_column<I, C>(label: &str, values: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CellContent>,
    {
        let mut table = Self::new([HeaderCell::new(label)]);
        for value in values {
            table.push_row([value]);
        }
        table
    }

    #[must_use]
    pub fn with_row<I, C>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CellContent>,
    {
        self.push_row(cells);
        self
    }

    pub fn push_row<I, C>(&mut self, cells: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<CellContent>,
    {
        self.body.get_or_insert_with(Vec::new).push(MemoryRow::new(cells));
    }

    #[must_use]
    pub fn header_labels(&self) -> Vec<&str> {
        self.headers
            .iter()
            .flatten()
            .map(|header| header.label.as_str())
            .collect()
    }

    #[must_use]
    pub fn row(&self, row: usize) -> Option<&MemoryRow> {
        self.body.as_ref()?.get(row)
    }

    pub fn row_mut(&mut self, row: usize) -> Option<&mut MemoryRow> {
        self.body.as_mut()?.get_mut(row)
    }

    pub fn rows(&self) -> impl Iterator<Item = &MemoryRow> {
        self.body.iter().flatten()
    }

    /// Indices of the rows not hidden.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<usize> {
        self.rows()
            .enumerate()
            .filter(|(_, row)| !row.hidden)
            .map(|(index, _)| index)
            .collect()
    }

    #[must_use]
    pub fn filter_rows(&self) -> &[FilterRow] {
        &self.filter_rows
    }

    #[must_use]
    pub fn events(&self) -> &[LifecycleEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn control_has_class(&self, filter: FilterId, class: &str) -> bool {
        self.control_classes
            .get(&filter)
            .is_some_and(|classes| classes.contains(class))
    }

    /// Drops the header section, leaving the body in place.
    pub fn take_headers(&mut self) -> Option<Vec<HeaderCell>> {
        self.headers.take()
    }

    /// Hides a row from outside the filters.
    pub fn hide_row(&mut self, row: usize) {
        if let Some(row) = self.row_mut(row) {
            row.hidden = true;
        }
    }
}

impl TableSource for MemoryTable {
    fn has_header(&self) -> bool {
        self.headers.is_some()
    }

    fn has_body(&self) -> bool {
        self.body.is_some()
    }

    fn headers(&self, selector: &str) -> Vec<HeaderCell> {
        match selector.trim() {
            "thead th" | "th" => self.headers.clone().unwrap_or_default(),
            other => {
                warn!(selector = other, "unsupported header selector, no headers matched");
                vec![]
            }
        }
    }

    fn row_count(&self) -> usize {
        self.body.as_ref().map_or(0, Vec::len)
    }

    fn cell(&self, row: usize, column: usize) -> Option<CellContent> {
        self.row(row)?.cells.get(column).cloned()
    }
}

impl RenderSurface for MemoryTable {
    fn remove_filter_row(&mut self, marker: &str) -> usize {
        let before = self.filter_rows.len();
        self.filter_rows.retain(|row| row.marker != marker);
        let removed = before - self.filter_rows.len();
        if removed > 0 {
            self.control_classes.clear();
        }
        removed
    }

    fn install_filter_row(&mut self, row: FilterRow) {
        self.filter_rows.push(row);
    }

    fn set_control_class(&mut self, filter: FilterId, class: &str, enabled: bool) {
        let classes = self.control_classes.entry(filter).or_default();
        if enabled {
            classes.insert(class.to_string());
        } else {
            classes.remove(class);
        }
    }

    fn row_classes(&self, row: usize) -> Vec<String> {
        self.row(row)
            .map(|row| row.classes.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn set_row_class(&mut self, row: usize, class: &str, enabled: bool) {
        if let Some(row) = self.row_mut(row) {
            if enabled {
                row.classes.insert(class.to_string());
            } else {
                row.classes.remove(class);
            }
        }
    }

    fn is_row_hidden(&self, row: usize) -> bool {
        self.row(row).is_some_and(|row| row.hidden)
    }

    fn set_row_hidden(&mut self, row: usize, hidden: bool) {
        if let Some(row) = self.row_mut(row) {
            row.hidden = hidden;
        }
    }

    fn emit(&mut self, event: LifecycleEvent) {
        self.events.push(event);
    }
}
