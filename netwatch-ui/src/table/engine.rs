//! Table engine: pure derivation of the visible page.
//!
//! Given the alert snapshot, the filter store, the group-by set, an optional
//! sort and the pagination state, the engine produces the page's rows plus
//! header metadata. It holds no state of its own and is recomputed on every
//! input change.

use super::columns::{accessor, ColumnId, ColumnSpec};
use super::filters::FilterSet;
use super::pager::{page_count, PageState};
use netwatch_common::AlertRecord;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// Column sort applied to leaf rows before grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: ColumnId,
    pub descending: bool,
}

/// A synthetic row standing for all leaves sharing one group key
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    /// (group column, shared value) pairs, in group-by order
    pub key: Vec<(ColumnId, String)>,
    pub sub_rows: Vec<AlertRecord>,
}

/// One row of the visible page: a single alert, or an aggregate
#[derive(Debug, Clone, PartialEq)]
pub enum TableRow {
    Leaf(AlertRecord),
    Aggregate(AggregateRow),
}

impl TableRow {
    pub fn is_aggregated(&self) -> bool {
        matches!(self, Self::Aggregate(_))
    }

    /// Ids of every alert this row stands for
    pub fn leaf_ids(&self) -> Vec<String> {
        match self {
            Self::Leaf(record) => vec![record.id.clone()],
            Self::Aggregate(group) => group.sub_rows.iter().map(|r| r.id.clone()).collect(),
        }
    }

    /// Stable render key: the alert id, or the joined group key
    pub fn key(&self) -> String {
        match self {
            Self::Leaf(record) => record.id.clone(),
            Self::Aggregate(group) => group
                .key
                .iter()
                .map(|(col, value)| format!("{}={}", col.as_str(), value))
                .collect::<Vec<_>>()
                .join("|"),
        }
    }

    /// Rendering contract for one cell. An aggregate row shows its group-key
    /// values and suppresses every other column (None renders blank); the
    /// suppression never touches the underlying records.
    pub fn cell(&self, column: ColumnId) -> Option<String> {
        match self {
            Self::Leaf(record) => Some(accessor(record, column)),
            Self::Aggregate(group) => group
                .key
                .iter()
                .find(|(col, _)| *col == column)
                .map(|(_, value)| value.clone()),
        }
    }
}

/// Cell of a leaf rendered underneath an expanded aggregate: group-key values
/// are already shown on the header row, so they render blank here.
pub fn leaf_cell_in_group(record: &AlertRecord, column: ColumnId, group_by: &[ColumnId]) -> Option<String> {
    if group_by.contains(&column) {
        None
    } else {
        Some(accessor(record, column))
    }
}

/// Header pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    pub page_count: usize,
    pub can_next: bool,
    pub can_prev: bool,
}

/// One derived view over the snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    /// Rows of the current page, grouped when grouping is active
    pub rows: Vec<TableRow>,
    pub meta: PageMeta,
    /// Index actually used for the slice; differs from the requested index
    /// only when the caller's stored index has gone stale
    pub page_index: usize,
    /// Leaf rows surviving the filters, across all pages
    pub filtered_leaves: usize,
    /// Top-level rows (aggregates when grouping, else leaves) before slicing
    pub top_level: usize,
    /// Ids of every filtered leaf; selection pruning keys off this
    pub filtered_ids: BTreeSet<String>,
}

fn compare(a: &AlertRecord, b: &AlertRecord, column: ColumnId) -> Ordering {
    match column {
        ColumnId::Severity => a.severity.cmp(&b.severity),
        ColumnId::Status => a.status.cmp(&b.status),
        ColumnId::StartTime => a.start_time.cmp(&b.start_time),
        ColumnId::LastActive => a.last_active.cmp(&b.last_active),
        _ => accessor(a, column).cmp(&accessor(b, column)),
    }
}

/// Collapse sorted leaves into aggregates, one per distinct group key, in
/// first-seen order of the leaf sequence.
fn group_rows(leaves: Vec<AlertRecord>, group_by: &[ColumnId]) -> Vec<AggregateRow> {
    let mut order: Vec<AggregateRow> = Vec::new();
    let mut positions: HashMap<Vec<String>, usize> = HashMap::new();

    for record in leaves {
        let values: Vec<String> = group_by.iter().map(|col| accessor(&record, *col)).collect();
        match positions.get(&values) {
            Some(&idx) => order[idx].sub_rows.push(record),
            None => {
                positions.insert(values.clone(), order.len());
                let key = group_by.iter().copied().zip(values).collect();
                order.push(AggregateRow { key, sub_rows: vec![record] });
            }
        }
    }
    order
}

/// Derive the visible page from `(snapshot, filters, group_by, sort, page)`.
///
/// A stale `page.index` never panics: the slice uses a clamped index and the
/// caller is expected to reconcile its stored state from `page_index`.
pub fn build_view(
    snapshot: &[AlertRecord],
    filters: &FilterSet,
    columns: &[ColumnSpec],
    group_by: &[ColumnId],
    sort: Option<&SortSpec>,
    page: &PageState,
) -> TableView {
    let mut leaves: Vec<AlertRecord> = snapshot
        .iter()
        .filter(|r| filters.matches(columns, r))
        .cloned()
        .collect();

    if let Some(spec) = sort {
        leaves.sort_by(|a, b| {
            let ord = compare(a, b, spec.column);
            if spec.descending {
                ord.reverse()
            } else {
                ord
            }
        });
    }

    let filtered_leaves = leaves.len();
    let filtered_ids: BTreeSet<String> = leaves.iter().map(|r| r.id.clone()).collect();

    let top_rows: Vec<TableRow> = if group_by.is_empty() {
        leaves.into_iter().map(TableRow::Leaf).collect()
    } else {
        group_rows(leaves, group_by).into_iter().map(TableRow::Aggregate).collect()
    };

    let top_level = top_rows.len();
    let count = page_count(top_level, page.size);
    let page_index = page.index.min(count.saturating_sub(1));

    let start = page_index * page.size.as_usize();
    let rows: Vec<TableRow> = top_rows
        .into_iter()
        .skip(start)
        .take(page.size.as_usize())
        .collect();

    TableView {
        rows,
        meta: PageMeta {
            page_count: count,
            can_next: page_index + 1 < count,
            can_prev: page_index > 0,
        },
        page_index,
        filtered_leaves,
        top_level,
        filtered_ids,
    }
}
