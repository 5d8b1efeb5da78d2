//! Row selection state machine.
//!
//! A reducer over a closed action set. Selection tracks leaf alert ids; a
//! group header is never stored, its display state is derived from its
//! sub-rows on every render. Stale handles (rows filtered out since the
//! action was queued) are absorbed silently.

use super::engine::TableRow;
use std::collections::BTreeSet;

/// Opaque handle to one visible row: its render key plus the leaf ids it
/// stands for (one id for a leaf, all sub-row ids for a group header).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowHandle {
    pub key: String,
    pub leaf_ids: Vec<String>,
}

impl RowHandle {
    pub fn of(row: &TableRow) -> Self {
        Self { key: row.key(), leaf_ids: row.leaf_ids() }
    }
}

/// Derived display state of a row's checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderState {
    Unselected,
    /// Some but not all sub-rows selected; never stored, always recomputed
    Partial,
    Selected,
}

/// Selection transitions. All are idempotent under repeated application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionAction {
    Select(RowHandle),
    Unselect(RowHandle),
    /// Select every row currently materialized on the page ("select page",
    /// deliberately not "select all filtered rows")
    SelectAll(Vec<RowHandle>),
    UnselectAll(Vec<RowHandle>),
    Clear,
    /// Prune ids no longer present in the filtered view
    Retain(BTreeSet<String>),
}

/// Selected leaf ids plus their insertion order.
///
/// Invariant: `order` holds exactly the ids in `selected`, each once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: BTreeSet<String>,
    order: Vec<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &BTreeSet<String> {
        &self.selected
    }

    /// Selected ids in the order they were first selected
    pub fn ordered(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Checkbox state for a row: a leaf is selected or not; a group header
    /// reflects its sub-rows, with `Partial` strictly in between.
    pub fn row_state(&self, handle: &RowHandle) -> HeaderState {
        let selected = handle.leaf_ids.iter().filter(|id| self.contains(id)).count();
        if selected == 0 {
            HeaderState::Unselected
        } else if selected == handle.leaf_ids.len() {
            HeaderState::Selected
        } else {
            HeaderState::Partial
        }
    }

    fn insert(&mut self, id: &str) {
        if self.selected.insert(id.to_string()) {
            self.order.push(id.to_string());
        }
    }

    fn remove(&mut self, id: &str) {
        if self.selected.remove(id) {
            self.order.retain(|held| held != id);
        }
    }

    /// Apply one transition, returning the next state
    pub fn reduce(&self, action: SelectionAction) -> SelectionState {
        let mut next = self.clone();
        match action {
            SelectionAction::Select(handle) => {
                for id in &handle.leaf_ids {
                    next.insert(id);
                }
            }
            SelectionAction::Unselect(handle) => {
                for id in &handle.leaf_ids {
                    next.remove(id);
                }
            }
            SelectionAction::SelectAll(handles) => {
                for handle in &handles {
                    for id in &handle.leaf_ids {
                        next.insert(id);
                    }
                }
            }
            SelectionAction::UnselectAll(handles) => {
                for handle in &handles {
                    for id in &handle.leaf_ids {
                        next.remove(id);
                    }
                }
            }
            SelectionAction::Clear => {
                next.selected.clear();
                next.order.clear();
            }
            SelectionAction::Retain(visible) => {
                next.order.retain(|id| visible.contains(id));
                next.selected.retain(|id| visible.contains(id));
            }
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str) -> RowHandle {
        RowHandle { key: id.to_string(), leaf_ids: vec![id.to_string()] }
    }

    fn group(key: &str, ids: &[&str]) -> RowHandle {
        RowHandle {
            key: key.to_string(),
            leaf_ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_select_then_unselect_is_self_inverse() {
        let before = SelectionState::new().reduce(SelectionAction::Select(leaf("a")));
        let toggled = before
            .reduce(SelectionAction::Select(leaf("b")))
            .reduce(SelectionAction::Unselect(leaf("b")));
        assert_eq!(toggled.ids(), before.ids());
        assert_eq!(toggled.ordered(), before.ordered());
    }

    #[test]
    fn test_select_is_idempotent_and_keeps_order_unique() {
        let state = SelectionState::new()
            .reduce(SelectionAction::Select(leaf("a")))
            .reduce(SelectionAction::Select(leaf("b")))
            .reduce(SelectionAction::Select(leaf("a")));
        assert_eq!(state.len(), 2);
        assert_eq!(state.ordered(), ["a", "b"]);
    }

    #[test]
    fn test_group_select_cascades_to_sub_rows() {
        let header = group("site=fra1", &["a", "b", "c"]);
        let state = SelectionState::new().reduce(SelectionAction::Select(header.clone()));
        assert!(state.contains("a") && state.contains("b") && state.contains("c"));
        assert_eq!(state.row_state(&header), HeaderState::Selected);

        let state = state.reduce(SelectionAction::Unselect(header.clone()));
        assert!(state.is_empty());
        assert_eq!(state.row_state(&header), HeaderState::Unselected);
    }

    #[test]
    fn test_group_unselect_drops_partially_selected_sub_rows() {
        let header = group("site=fra1", &["a", "b"]);
        let state = SelectionState::new()
            .reduce(SelectionAction::Select(leaf("a")))
            .reduce(SelectionAction::Select(leaf("z")));
        assert_eq!(state.row_state(&header), HeaderState::Partial);

        let state = state.reduce(SelectionAction::Unselect(header));
        assert!(!state.contains("a"));
        assert!(state.contains("z"));
    }

    #[test]
    fn test_header_tri_state_derivation() {
        let header = group("g", &["a", "b", "c"]);
        let mut state = SelectionState::new();
        assert_eq!(state.row_state(&header), HeaderState::Unselected);

        state = state.reduce(SelectionAction::Select(leaf("a")));
        assert_eq!(state.row_state(&header), HeaderState::Partial);

        state = state
            .reduce(SelectionAction::Select(leaf("b")))
            .reduce(SelectionAction::Select(leaf("c")));
        assert_eq!(state.row_state(&header), HeaderState::Selected);
    }

    #[test]
    fn test_select_all_then_unselect_all_on_page_ids() {
        let page = vec![leaf("a"), group("g", &["b", "c"]), leaf("d")];
        let state = SelectionState::new().reduce(SelectionAction::SelectAll(page.clone()));
        assert_eq!(state.len(), 4);

        let state = state.reduce(SelectionAction::UnselectAll(page));
        assert!(state.is_empty());
    }

    #[test]
    fn test_unselect_all_only_touches_given_page() {
        let page_one = vec![leaf("a"), leaf("b")];
        let page_two = vec![leaf("c")];
        let state = SelectionState::new()
            .reduce(SelectionAction::SelectAll(page_one.clone()))
            .reduce(SelectionAction::SelectAll(page_two))
            .reduce(SelectionAction::UnselectAll(page_one));
        assert_eq!(state.ordered(), ["c"]);
    }

    #[test]
    fn test_stale_handles_are_absorbed_silently() {
        let state = SelectionState::new().reduce(SelectionAction::Unselect(leaf("ghost")));
        assert!(state.is_empty());

        let state = SelectionState::new()
            .reduce(SelectionAction::Select(leaf("a")))
            .reduce(SelectionAction::Select(leaf("b")))
            .reduce(SelectionAction::Retain(BTreeSet::from(["b".to_string()])));
        assert_eq!(state.ordered(), ["b"]);
        assert_eq!(state.ids().len(), 1);
    }

    #[test]
    fn test_order_and_set_stay_in_lockstep() {
        let state = SelectionState::new()
            .reduce(SelectionAction::Select(leaf("c")))
            .reduce(SelectionAction::Select(leaf("a")))
            .reduce(SelectionAction::Unselect(leaf("c")))
            .reduce(SelectionAction::Select(leaf("b")));
        assert_eq!(state.ordered(), ["a", "b"]);
        let from_order: BTreeSet<String> = state.ordered().iter().cloned().collect();
        assert_eq!(&from_order, state.ids());
    }
}
