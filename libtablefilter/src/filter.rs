//! Filter state of a single column.
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::debounce::DebounceHandle;
use crate::error::TableFilterError;
use crate::extract::ExtractedCell;
use crate::profile::{ColumnProfile, FilterStrategy};
use crate::surface::{ControlKind, FilterControl};

/// Identity of a filter. Equal to the index of the column it filters, so it
/// stays stable across re-initializations of the same table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[display("filter #{_0}")]
pub struct FilterId(pub usize);

/// Current choice of a selection control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    #[display("All")]
    All,
    #[display("Not Empty")]
    NotEmpty,
    #[display("Empty Only")]
    EmptyOnly,
    #[display("{_0}")]
    Value(String),
}

impl Selection {
    /// Parses the label of a control option.
    #[must_use]
    pub fn from_option(label: &str) -> Self {
        match label {
            "All" => Selection::All,
            "Not Empty" => Selection::NotEmpty,
            "Empty Only" => Selection::EmptyOnly,
            value => Selection::Value(value.to_string()),
        }
    }

    /// A cell matches when any one of its values satisfies the selection.
    #[must_use]
    pub fn matches(&self, values: &[String]) -> bool {
        match self {
            Selection::All => true,
            Selection::NotEmpty => values.iter().any(|value| !value.is_empty()),
            Selection::EmptyOnly => values.iter().any(String::is_empty),
            Selection::Value(selected) => values.iter().any(|value| value == selected),
        }
    }
}

/// Name of the row marker a filter puts on the rows it rejects.
#[must_use]
pub fn row_marker(prefix: &str, column_index: usize) -> String {
    format!("{prefix}{column_index}")
}

#[derive(Debug)]
pub enum FilterKind {
    Enumerable {
        selection: Selection,
        /// Distinct values offered after the fixed options.
        values: Vec<String>,
    },
    FreeText {
        pattern: String,
        pattern_lower: String,
        /// Bumped on every pattern change, used to discard superseded timers.
        revision: u64,
        pending: Option<DebounceHandle>,
    },
}

#[derive(Debug)]
pub struct FilterState {
    id: FilterId,
    column_index: usize,
    kind: FilterKind,
}

impl FilterState {
    pub fn enumerable<I, V>(column_index: usize, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            id: FilterId(column_index),
            column_index,
            kind: FilterKind::Enumerable {
                selection: Selection::All,
                values: values.into_iter().map(Into::into).collect(),
            },
        }
    }

    pub fn free_text(column_index: usize) -> Self {
        Self {
            id: FilterId(column_index),
            column_index,
            kind: FilterKind::FreeText {
                pattern: String::new(),
                pattern_lower: String::new(),
                revision: 0,
                pending: None,
            },
        }
    }

    /// Creates the filter for a profiled column, `None` if the column is not filterable.
    pub fn from_profile(profile: &ColumnProfile) -> Option<Self> {
        if !profile.filterable {
            return None;
        }
        Some(match profile.strategy {
            FilterStrategy::Enumerable => {
                Self::enumerable(profile.column_index, profile.distinct_values.iter().cloned())
            }
            FilterStrategy::FreeText => Self::free_text(profile.column_index),
        })
    }

    #[must_use]
    pub fn id(&self) -> FilterId {
        self.id
    }

    #[must_use]
    pub fn column_index(&self) -> usize {
        self.column_index
    }

    #[must_use]
    pub fn kind(&self) -> &FilterKind {
        &self.kind
    }

    #[must_use]
    pub fn strategy(&self) -> FilterStrategy {
        match self.kind {
            FilterKind::Enumerable { .. } => FilterStrategy::Enumerable,
            FilterKind::FreeText { .. } => FilterStrategy::FreeText,
        }
    }

    #[must_use]
    pub fn selection(&self) -> Option<&Selection> {
        match &self.kind {
            FilterKind::Enumerable { selection, .. } => Some(selection),
            FilterKind::FreeText { .. } => None,
        }
    }

    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        match &self.kind {
            FilterKind::FreeText { pattern, .. } => Some(pattern),
            FilterKind::Enumerable { .. } => None,
        }
    }

    /// True while the filter can reject rows.
    #[must_use]
    pub fn is_active(&self) -> bool {
        match &self.kind {
            FilterKind::Enumerable { selection, .. } => *selection != Selection::All,
            FilterKind::FreeText { pattern, .. } => !pattern.is_empty(),
        }
    }

    /// Option labels of a selection control, empty for free text.
    #[must_use]
    pub fn options(&self) -> Vec<String> {
        match &self.kind {
            FilterKind::Enumerable { values, .. } => [
                Selection::All,
                Selection::NotEmpty,
                Selection::EmptyOnly,
            ]
            .iter()
            .map(ToString::to_string)
            .chain(values.iter().cloned())
            .collect(),
            FilterKind::FreeText { .. } => vec![],
        }
    }

    #[must_use]
    pub fn control(&self) -> FilterControl {
        let kind = match self.kind {
            FilterKind::Enumerable { .. } => ControlKind::Select {
                options: self.options(),
            },
            FilterKind::FreeText { .. } => ControlKind::Text,
        };
        FilterControl {
            filter_id: self.id,
            kind,
        }
    }

    /// Selection filters compare the extracted values, free-text filters search
    /// the raw cell text ignoring case.
    #[must_use]
    pub fn matches(&self, cell: &ExtractedCell) -> bool {
        match &self.kind {
            FilterKind::Enumerable { selection, .. } => selection.matches(&cell.values),
            FilterKind::FreeText { pattern_lower, .. } => {
                pattern_lower.is_empty() || cell.raw.to_lowercase().contains(pattern_lower)
            }
        }
    }

    pub fn select(&mut self, new_selection: Selection) -> Result<(), TableFilterError> {
        match &mut self.kind {
            FilterKind::Enumerable { selection, .. } => {
                *selection = new_selection;
                Ok(())
            }
            FilterKind::FreeText { .. } => Err(self.mismatch()),
        }
    }

    /// Stores a new pattern and returns its revision.
    pub fn set_pattern(&mut self, new_pattern: impl Into<String>) -> Result<u64, TableFilterError> {
        match &mut self.kind {
            FilterKind::FreeText {
                pattern,
                pattern_lower,
                revision,
                ..
            } => {
                *pattern = new_pattern.into();
                *pattern_lower = pattern.to_lowercase();
                *revision += 1;
                Ok(*revision)
            }
            FilterKind::Enumerable { .. } => Err(self.mismatch()),
        }
    }

    /// Back to `All` or the empty pattern. Cancels a pending evaluation.
    pub fn reset(&mut self) {
        match &mut self.kind {
            FilterKind::Enumerable { selection, .. } => *selection = Selection::All,
            FilterKind::FreeText {
                pattern,
                pattern_lower,
                revision,
                pending,
            } => {
                pattern.clear();
                pattern_lower.clear();
                *revision += 1;
                *pending = None;
            }
        }
    }

    /// Installs `handle` as the pending evaluation, cancelling the previous one.
    /// Returns whether an evaluation was already pending.
    pub(crate) fn replace_pending(&mut self, handle: DebounceHandle) -> bool {
        match &mut self.kind {
            FilterKind::FreeText { pending, .. } => pending.replace(handle).is_some(),
            FilterKind::Enumerable { .. } => false,
        }
    }

    /// Clears the pending evaluation if it is the one scheduled for `revision`.
    pub(crate) fn complete_pending(&mut self, completed: u64) -> bool {
        match &mut self.kind {
            FilterKind::FreeText {
                revision, pending, ..
            } if *revision == completed
                && pending.as_ref().is_some_and(|handle| handle.revision() == completed) =>
            {
                *pending = None;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn has_pending_evaluation(&self) -> bool {
        matches!(
            &self.kind,
            FilterKind::FreeText {
                pending: Some(_),
                ..
            }
        )
    }

    fn mismatch(&self) -> TableFilterError {
        TableFilterError::StrategyMismatch {
            id: self.id,
            actual: self.strategy(),
        }
    }
}
