//! Client-side filter store.
//!
//! Holds the active filter criteria independently of the table engine; the
//! engine consumes it to derive the filtered view. Server-side filters
//! (status, time range) live on the mutation coordinator instead.

use super::columns::{membership_predicate, ColumnId, ColumnSpec, FilterValue};
use netwatch_common::AlertRecord;
use std::collections::{BTreeMap, BTreeSet};

/// Active client-side filters: a free-text name query plus per-column
/// multi-value selections. Empty query/sets constrain nothing; dimensions
/// compose with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    name_query: String,
    selected: BTreeMap<ColumnId, BTreeSet<String>>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name_query(&self) -> &str {
        &self.name_query
    }

    pub fn set_name_query(&mut self, query: impl Into<String>) {
        self.name_query = query.into();
    }

    pub fn selected(&self, column: ColumnId) -> Option<&BTreeSet<String>> {
        self.selected.get(&column)
    }

    pub fn is_selected(&self, column: ColumnId, value: &str) -> bool {
        self.selected.get(&column).is_some_and(|set| set.contains(value))
    }

    /// Add or remove one value from a column's selection set
    pub fn toggle(&mut self, column: ColumnId, value: &str) {
        let set = self.selected.entry(column).or_default();
        if !set.remove(value) {
            set.insert(value.to_string());
        }
        if set.is_empty() {
            self.selected.remove(&column);
        }
    }

    /// Drop all multi-value selections, keeping the name query
    pub fn clear_selections(&mut self) {
        self.selected.clear();
    }

    pub fn clear_all(&mut self) {
        self.name_query.clear();
        self.selected.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.name_query.is_empty() && self.selected.is_empty()
    }

    /// True iff `record` passes every active filter dimension
    pub fn matches(&self, columns: &[ColumnSpec], record: &AlertRecord) -> bool {
        if !self.name_query.is_empty() {
            let value = FilterValue::Text(self.name_query.clone());
            let pass = columns
                .iter()
                .find(|c| c.id == ColumnId::Name)
                .and_then(|c| c.predicate)
                .map(|p| p(record, ColumnId::Name, &value))
                // No name column registered means the query constrains nothing
                .unwrap_or(true);
            if !pass {
                return false;
            }
        }

        for (column, set) in &self.selected {
            if set.is_empty() {
                continue;
            }
            let value = FilterValue::OneOf(set.clone());
            let predicate = columns
                .iter()
                .find(|c| c.id == *column)
                .and_then(|c| c.predicate)
                .unwrap_or(membership_predicate);
            if !predicate(record, *column, &value) {
                return false;
            }
        }
        true
    }
}
