//! Headless core of the alert table: column model, filter store, derivation
//! engine, selection and mutation reducers, pagination. No rendering here —
//! the Leptos pages consume these types and stay thin.

pub mod bulk;
pub mod columns;
pub mod engine;
pub mod filters;
pub mod mutations;
pub mod pager;
pub mod selection;

pub use bulk::{BulkOutcome, BulkVerb};
pub use columns::{default_columns, groupable_columns, ColumnId, ColumnSpec};
pub use engine::{build_view, leaf_cell_in_group, SortSpec, TableRow, TableView};
pub use filters::FilterSet;
pub use mutations::{MutationAction, MutationState};
pub use pager::{page_count, PageSize, PageState, PagerAction};
pub use selection::{HeaderState, RowHandle, SelectionAction, SelectionState};
