//! Applying row decisions to the rendering surface.
use std::collections::BTreeSet;

use crate::filter::row_marker;
use crate::registry::RowDecision;
use crate::surface::RenderSurface;

/// Changes made to the surface by one [`VisibilityApplier::apply`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    /// Rows that were hidden and are now shown.
    pub shown: usize,
    /// Rows that were visible and are now hidden.
    pub hidden: usize,
    /// Row markers added or removed.
    pub markers_changed: usize,
}

impl ApplySummary {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Keeps each row's filter markers equal to the set of filters rejecting it,
/// and hides exactly the rows carrying at least one marker.
///
/// Only rows hidden by this applier are ever shown again; a row that was
/// already hidden by something else stays hidden even after it carried markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityApplier {
    marker_prefix: String,
    /// Rows this applier hid.
    hidden_rows: BTreeSet<usize>,
}

impl VisibilityApplier {
    pub fn new(marker_prefix: impl Into<String>) -> Self {
        Self {
            marker_prefix: marker_prefix.into(),
            hidden_rows: BTreeSet::new(),
        }
    }

    /// Whether `row` is hidden because of the filters.
    #[must_use]
    pub fn hides(&self, row: usize) -> bool {
        self.hidden_rows.contains(&row)
    }

    /// Row visibility by row index.
    #[must_use]
    pub fn visibility(decisions: &[RowDecision]) -> Vec<bool> {
        decisions.iter().map(RowDecision::is_visible).collect()
    }

    /// Whether `class` is one of the markers managed by this applier.
    #[must_use]
    pub fn is_filter_marker(&self, class: &str) -> bool {
        class
            .strip_prefix(self.marker_prefix.as_str())
            .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
    }

    /// Applying the same decisions twice leaves the surface as after the first call.
    pub fn apply<S>(&mut self, surface: &mut S, decisions: &[RowDecision]) -> ApplySummary
    where
        S: RenderSurface + ?Sized,
    {
        let mut summary = ApplySummary::default();

        for decision in decisions {
            let row = decision.row_index;
            let wanted: BTreeSet<String> = decision
                .hidden_by
                .iter()
                .map(|id| row_marker(&self.marker_prefix, id.0))
                .collect();
            summary.markers_changed += self.sync_markers(surface, row, &wanted);

            let hide = !wanted.is_empty();
            match (hide, surface.is_row_hidden(row)) {
                (true, false) => {
                    surface.set_row_hidden(row, true);
                    self.hidden_rows.insert(row);
                    summary.hidden += 1;
                }
                (false, true) if self.hidden_rows.remove(&row) => {
                    surface.set_row_hidden(row, false);
                    summary.shown += 1;
                }
                (false, false) => {
                    // Shown again from outside.
                    self.hidden_rows.remove(&row);
                }
                _ => {}
            }
        }

        summary
    }

    /// Removes every filter marker and shows the rows this applier hid.
    pub fn clear<S>(&mut self, surface: &mut S) -> ApplySummary
    where
        S: RenderSurface + ?Sized,
    {
        let mut summary = ApplySummary::default();
        for row in 0..surface.row_count() {
            summary.markers_changed += self.sync_markers(surface, row, &BTreeSet::new());
        }
        for row in std::mem::take(&mut self.hidden_rows) {
            if surface.is_row_hidden(row) {
                surface.set_row_hidden(row, false);
                summary.shown += 1;
            }
        }
        summary
    }

    fn sync_markers<S>(&self, surface: &mut S, row: usize, wanted: &BTreeSet<String>) -> usize
    where
        S: RenderSurface + ?Sized,
    {
        let present: BTreeSet<String> = surface
            .row_classes(row)
            .into_iter()
            .filter(|class| self.is_filter_marker(class))
            .collect();

        let mut changed = 0;
        for stale in present.difference(wanted) {
            surface.set_row_class(row, stale, false);
            changed += 1;
        }
        for missing in wanted.difference(&present) {
            surface.set_row_class(row, missing, true);
            changed += 1;
        }
        changed
    }
}
