//! Per-column filters for tabular data.
//!
//! [`TableFilter::attach`] profiles every column of a table, picks a selection
//! or free-text control for each filterable one and installs a row of
//! controls. Control changes are routed back through
//! [`TableFilter::on_filter_changed`]; a row stays visible only while every
//! filter accepts it.
//!
//! The table itself is reached through the [`TableSource`] and
//! [`RenderSurface`] traits. [`MemoryTable`] implements both.
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod extract;
pub mod filter;
pub mod logs;
pub mod profile;
pub mod registry;
pub mod sources;
pub mod surface;
pub mod visibility;

pub use config::FilterConfig;
pub use controller::{EvaluationSummary, FilterChange, FilterOutcome, TableFilter};
pub use error::TableFilterError;
pub use extract::{ExtractedCell, SeparatorPattern, extract};
pub use filter::{FilterId, FilterKind, FilterState, Selection};
pub use profile::{ColumnProfile, FilterStrategy};
pub use registry::{FilterRegistry, RowCells, RowDecision};
pub use sources::{MemoryRow, MemoryTable, parse_delimited};
pub use surface::{
    CellContent, ControlKind, FilterCell, FilterControl, FilterRow, HeaderCell, LifecycleEvent,
    RenderSurface, TableSource,
};
pub use visibility::{ApplySummary, VisibilityApplier};
