//! The seam between the filtering core and whatever draws the table.
//!
//! The core never holds on to cells or rows. It reads text through
//! [`TableSource`] and pushes its decisions back through [`RenderSurface`].
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::filter::FilterId;

/// Text of one body cell as read from the surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellContent {
    /// Raw inner text of the cell, markup included.
    pub markup: String,
    /// Current value of an embedded value-bearing element (an input, a select).
    pub value: Option<String>,
}

impl CellContent {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            value: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Text used for value extraction: the embedded value when it is non-empty,
    /// the markup otherwise.
    #[must_use]
    pub fn source_text(&self) -> &str {
        match self.value.as_deref() {
            Some(value) if !value.is_empty() => value,
            _ => &self.markup,
        }
    }
}

impl From<&str> for CellContent {
    fn from(markup: &str) -> Self {
        Self::new(markup)
    }
}

impl From<String> for CellContent {
    fn from(markup: String) -> Self {
        Self::new(markup)
    }
}

/// A header cell together with the marker classes it carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderCell {
    pub label: String,
    pub classes: Vec<String>,
}

impl HeaderCell {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            classes: vec![],
        }
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Busy-state notifications emitted around every evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum LifecycleEvent {
    #[display("filterStart")]
    FilterStart,
    #[display("filterEnd")]
    FilterEnd,
}

/// The kind of control a filterable column gets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlKind {
    /// Drop-down list with the given option labels.
    Select { options: Vec<String> },
    /// Free-text input.
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterControl {
    pub filter_id: FilterId,
    pub kind: ControlKind,
}

/// One cell of the injected filter row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterCell {
    /// Column without a control.
    NoFilter,
    Control(FilterControl),
}

/// The row of filter controls injected under the table headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRow {
    /// Marker class identifying the row, so a later initialization can remove it.
    pub marker: String,
    /// One cell per header, in column order.
    pub cells: Vec<FilterCell>,
}

impl FilterRow {
    pub fn controls(&self) -> impl Iterator<Item = &FilterControl> {
        self.cells.iter().filter_map(|cell| match cell {
            FilterCell::Control(control) => Some(control),
            FilterCell::NoFilter => None,
        })
    }
}

/// Read access to a table.
pub trait TableSource {
    /// Whether the table has a header section.
    fn has_header(&self) -> bool;
    /// Whether the table has a body section.
    fn has_body(&self) -> bool;
    /// Header cells matched by `selector`, in column order.
    fn headers(&self, selector: &str) -> Vec<HeaderCell>;
    /// Number of body rows.
    fn row_count(&self) -> usize;
    /// Body cell at `row`/`column`, `None` if the row has no such cell.
    fn cell(&self, row: usize, column: usize) -> Option<CellContent>;
}

/// Write access to the table, used to install controls and apply decisions.
pub trait RenderSurface: TableSource {
    /// Removes every injected filter row carrying `marker`, returning how many were removed.
    fn remove_filter_row(&mut self, marker: &str) -> usize;
    fn install_filter_row(&mut self, row: FilterRow);
    /// Adds or removes `class` on the control belonging to `filter`.
    fn set_control_class(&mut self, filter: FilterId, class: &str, enabled: bool);
    /// Classes currently carried by body row `row`.
    fn row_classes(&self, row: usize) -> Vec<String>;
    fn set_row_class(&mut self, row: usize, class: &str, enabled: bool);
    fn is_row_hidden(&self, row: usize) -> bool;
    fn set_row_hidden(&mut self, row: usize, hidden: bool);
    fn emit(&mut self, event: LifecycleEvent);
}
