//! The per-table owner of profiles, filters and pending evaluations.
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, trace, warn};

use crate::config::FilterConfig;
use crate::debounce::{DebounceHandle, FilterEvent};
use crate::error::TableFilterError;
use crate::filter::{FilterId, FilterState, Selection};
use crate::profile::ColumnProfile;
use crate::registry::{FilterRegistry, RowCells, RowDecision};
use crate::surface::{FilterCell, FilterRow, LifecycleEvent, RenderSurface};
use crate::visibility::{ApplySummary, VisibilityApplier};

/// A user interaction with one filter control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    /// New choice of a selection control.
    Select(Selection),
    /// New content of a free-text control.
    Text(String),
}

impl FilterChange {
    /// A selection change from the label of the chosen option.
    #[must_use]
    pub fn option(label: &str) -> Self {
        FilterChange::Select(Selection::from_option(label))
    }

    pub fn text(pattern: impl Into<String>) -> Self {
        FilterChange::Text(pattern.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationSummary {
    /// Number of evaluation passes run by this table so far, this one included.
    pub pass: u64,
    pub visible_rows: usize,
    pub total_rows: usize,
    pub applied: ApplySummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    /// The change was evaluated right away.
    Evaluated(EvaluationSummary),
    /// The change will be evaluated once the control has been quiet for the debounce period.
    Scheduled,
}

/// Filters attached to one table.
///
/// Created by [`TableFilter::attach`]. Each table owns its own registry; nothing
/// is shared between tables.
pub struct TableFilter<S> {
    surface: S,
    config: FilterConfig,
    applier: VisibilityApplier,
    profiles: Vec<ColumnProfile>,
    registry: FilterRegistry,
    events_tx: UnboundedSender<FilterEvent>,
    events_rx: UnboundedReceiver<FilterEvent>,
    /// Bumped on every initialization so timers of a previous one are ignored.
    generation: u64,
    evaluations: u64,
    attached: bool,
}

impl<S: std::fmt::Debug> std::fmt::Debug for TableFilter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableFilter")
            .field("surface", &self.surface)
            .field("config", &self.config)
            .field("profiles", &self.profiles)
            .field("registry", &self.registry)
            .field("generation", &self.generation)
            .field("evaluations", &self.evaluations)
            .field("attached", &self.attached)
            .finish()
    }
}

impl<S: RenderSurface> TableFilter<S> {
    /// Profiles the table, creates its filters and installs the control row.
    ///
    /// A table without a header or body section is left untouched and gets no filters.
    pub fn attach(surface: S, config: FilterConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut table = Self {
            surface,
            applier: VisibilityApplier::new(config.row_marker_prefix.clone()),
            config,
            profiles: vec![],
            registry: FilterRegistry::default(),
            events_tx,
            events_rx,
            generation: 0,
            evaluations: 0,
            attached: false,
        };
        table.initialize();
        table
    }

    /// Rebuilds everything from the current table content.
    pub fn reinitialize(&mut self) {
        self.initialize();
    }

    /// Rebuilds everything with a new configuration.
    pub fn reconfigure(&mut self, config: FilterConfig) {
        // Markers written under the old prefix must go before the prefix changes.
        if self.attached {
            self.applier.clear(&mut self.surface);
        }
        self.applier = VisibilityApplier::new(config.row_marker_prefix.clone());
        self.config = config;
        self.initialize();
    }

    fn initialize(&mut self) {
        self.generation += 1;
        let cancelled = self.pending_count();
        // Dropping the filters cancels their pending evaluations.
        self.registry = FilterRegistry::default();
        self.close_cancelled(cancelled);
        self.profiles.clear();
        let was_attached = std::mem::take(&mut self.attached);

        if !self.surface.has_header() || !self.surface.has_body() {
            if was_attached {
                self.detach_from_surface();
            }
            debug!("table has no header or body section, filters not attached");
            return;
        }

        self.detach_from_surface();

        let headers = self.surface.headers(&self.config.header_selector);
        let mut cells = Vec::with_capacity(headers.len());
        let mut filters = vec![];

        for (column_index, header) in headers.iter().enumerate() {
            if header.has_class(&self.config.no_filter_marker) {
                cells.push(FilterCell::NoFilter);
                continue;
            }

            let profile = ColumnProfile::from_source(&self.surface, column_index, &self.config);
            trace!(
                column_index,
                distinct = profile.distinct_count(),
                max_len = profile.max_value_length,
                strategy = %profile.strategy,
                filterable = profile.filterable,
                "profiled column"
            );
            match FilterState::from_profile(&profile) {
                Some(filter) => {
                    cells.push(FilterCell::Control(filter.control()));
                    filters.push(filter);
                }
                None => cells.push(FilterCell::NoFilter),
            }
            self.profiles.push(profile);
        }

        self.registry = FilterRegistry::new(filters);
        self.surface.install_filter_row(FilterRow {
            marker: self.config.filter_row_marker.clone(),
            cells,
        });
        self.attached = true;

        info!(
            columns = headers.len(),
            filters = self.registry.len(),
            rows = self.surface.row_count(),
            "attached table filters"
        );
    }

    /// Routes a control interaction to its filter.
    ///
    /// Selection changes are evaluated immediately. Free-text changes are
    /// debounced; drive them with [`TableFilter::process_next`] or
    /// [`TableFilter::process_pending`]. Outside a tokio runtime free-text
    /// changes are evaluated immediately as well.
    pub fn on_filter_changed(
        &mut self,
        id: FilterId,
        change: FilterChange,
    ) -> Result<FilterOutcome, TableFilterError> {
        let filter = self
            .registry
            .filter_mut(id)
            .ok_or(TableFilterError::UnknownFilter(id))?;

        match change {
            FilterChange::Select(selection) => {
                debug!(%id, %selection, "selection changed");
                filter.select(selection)?;
                self.sync_active_marker(id);
                self.surface.emit(LifecycleEvent::FilterStart);
                Ok(FilterOutcome::Evaluated(self.evaluate_pass()))
            }
            FilterChange::Text(pattern) => {
                let revision = filter.set_pattern(pattern)?;
                let event = FilterEvent::DebounceElapsed {
                    filter: id,
                    generation: self.generation,
                    revision,
                };

                match DebounceHandle::schedule(self.config.debounce(), event, self.events_tx.clone())
                {
                    Some(handle) => {
                        let already_pending = filter.replace_pending(handle);
                        trace!(%id, revision, already_pending, "scheduled evaluation");
                        self.sync_active_marker(id);
                        if !already_pending {
                            self.surface.emit(LifecycleEvent::FilterStart);
                        }
                        Ok(FilterOutcome::Scheduled)
                    }
                    None => {
                        warn!(%id, "no async runtime, evaluating without debounce");
                        self.sync_active_marker(id);
                        self.surface.emit(LifecycleEvent::FilterStart);
                        Ok(FilterOutcome::Evaluated(self.evaluate_pass()))
                    }
                }
            }
        }
    }

    /// Waits for the next debounced evaluation and runs it.
    ///
    /// Returns `None` right away when nothing is pending.
    pub async fn process_next(&mut self) -> Option<EvaluationSummary> {
        while self.has_pending_evaluations() {
            let event = self.events_rx.recv().await?;
            if let Some(summary) = self.handle_event(event) {
                return Some(summary);
            }
        }
        None
    }

    /// Runs the debounced evaluations whose quiet period already elapsed.
    pub fn process_pending(&mut self) -> Vec<EvaluationSummary> {
        let mut summaries = vec![];
        while let Ok(event) = self.events_rx.try_recv() {
            if let Some(summary) = self.handle_event(event) {
                summaries.push(summary);
            }
        }
        summaries
    }

    /// Runs a full evaluation pass now, regardless of pending debounces.
    pub fn evaluate_now(&mut self) -> EvaluationSummary {
        self.surface.emit(LifecycleEvent::FilterStart);
        self.evaluate_pass()
    }

    /// Puts every filter back to its neutral state and shows all rows again.
    pub fn reset(&mut self) -> EvaluationSummary {
        let cancelled = self.pending_count();
        self.registry.reset();
        self.close_cancelled(cancelled);
        let ids: Vec<FilterId> = self.registry.iter().map(FilterState::id).collect();
        for id in ids {
            self.sync_active_marker(id);
        }
        self.evaluate_now()
    }

    fn handle_event(&mut self, event: FilterEvent) -> Option<EvaluationSummary> {
        match event {
            FilterEvent::DebounceElapsed {
                filter,
                generation,
                revision,
            } => {
                if generation != self.generation {
                    trace!(%filter, "ignoring timer from a previous initialization");
                    return None;
                }
                if !self.registry.filter_mut(filter)?.complete_pending(revision) {
                    trace!(%filter, revision, "ignoring superseded timer");
                    return None;
                }
                Some(self.evaluate_pass())
            }
        }
    }

    fn evaluate_pass(&mut self) -> EvaluationSummary {
        let decisions = self
            .registry
            .evaluate(&self.surface, &self.config.separator_pattern);
        let applied = self.applier.apply(&mut self.surface, &decisions);
        self.evaluations += 1;

        let summary = EvaluationSummary {
            pass: self.evaluations,
            visible_rows: decisions.iter().filter(|d| d.is_visible()).count(),
            total_rows: decisions.len(),
            applied,
        };
        debug!(
            pass = summary.pass,
            visible = summary.visible_rows,
            total = summary.total_rows,
            shown = applied.shown,
            hidden = applied.hidden,
            "evaluated filters"
        );
        self.surface.emit(LifecycleEvent::FilterEnd);
        summary
    }

    /// Removes the injected filter row and every trace of earlier passes.
    fn detach_from_surface(&mut self) {
        let removed = self.surface.remove_filter_row(&self.config.filter_row_marker);
        if removed > 0 {
            debug!(removed, "removed previously injected filter row");
        }
        self.applier.clear(&mut self.surface);
    }

    fn pending_count(&self) -> usize {
        self.registry
            .iter()
            .filter(|filter| filter.has_pending_evaluation())
            .count()
    }

    /// Every pending evaluation was announced with a `FilterStart`; a cancelled
    /// one still owes its `FilterEnd`.
    fn close_cancelled(&mut self, cancelled: usize) {
        if cancelled > 0 {
            trace!(cancelled, "cancelled pending evaluations");
        }
        for _ in 0..cancelled {
            self.surface.emit(LifecycleEvent::FilterEnd);
        }
    }

    fn sync_active_marker(&mut self, id: FilterId) {
        if let Some(filter) = self.registry.filter(id) {
            let active = filter.is_active();
            self.surface
                .set_control_class(id, &self.config.active_marker_class, active);
        }
    }

    /// Current decision for every body row, computed on demand.
    #[must_use]
    pub fn decisions(&self) -> Vec<RowDecision> {
        self.registry
            .evaluate(&self.surface, &self.config.separator_pattern)
    }

    /// Whether body row `row` passes every filter right now.
    #[must_use]
    pub fn row_visible(&self, row: usize) -> bool {
        let cells = RowCells::read(
            &self.surface,
            row,
            self.registry.columns(),
            &self.config.separator_pattern,
        );
        self.registry.row_visible(&cells)
    }

    /// Indices of the body rows passing every filter right now.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<usize> {
        self.decisions()
            .into_iter()
            .filter(RowDecision::is_visible)
            .map(|decision| decision.row_index)
            .collect()
    }

    #[must_use]
    pub fn has_pending_evaluations(&self) -> bool {
        self.registry
            .iter()
            .any(FilterState::has_pending_evaluation)
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    #[must_use]
    pub fn profiles(&self) -> &[ColumnProfile] {
        &self.profiles
    }

    #[must_use]
    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Number of evaluation passes run so far.
    #[must_use]
    pub fn evaluation_count(&self) -> u64 {
        self.evaluations
    }
}
