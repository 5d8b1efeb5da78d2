//! Mutation coordinator.
//!
//! Owns the top-level server-side filters (status set, time range) and the
//! clear-and-refetch handshake that runs after those filters change or after
//! a bulk mutation completes. The three clear flags are edge-triggered: armed
//! together, disarmed individually by the widget that owns each one. A widget
//! that never mounts leaves its flag armed without blocking the others.

use netwatch_common::AlertStatus;
use std::collections::BTreeSet;

/// Coordinator state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationState {
    /// Statuses requested from the server; changing this forces a refetch
    pub status: BTreeSet<AlertStatus>,
    /// Look-back window in hours; None means unbounded
    pub time_range_hours: Option<u32>,
    pub clear_multiselect: bool,
    pub clear_input: bool,
    pub clear_selection: bool,
}

impl Default for MutationState {
    fn default() -> Self {
        Self {
            status: BTreeSet::from([AlertStatus::Active]),
            time_range_hours: None,
            clear_multiselect: false,
            clear_input: false,
            clear_selection: false,
        }
    }
}

/// Coordinator transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationAction {
    SetStatus(Vec<AlertStatus>),
    SetTimeRange(Option<u32>),
    /// Arm all three clear flags at once (start of a clear cycle)
    SetClearMutations,
    UnsetClearMutations,
    SetClearMultiselect,
    UnsetClearMultiselect,
    SetClearInput,
    UnsetClearInput,
    SetClearSelection,
    UnsetClearSelection,
}

impl MutationState {
    pub fn reduce(&self, action: MutationAction) -> MutationState {
        let mut next = self.clone();
        match action {
            MutationAction::SetStatus(statuses) => {
                next.status = statuses.into_iter().collect();
            }
            MutationAction::SetTimeRange(hours) => {
                next.time_range_hours = hours;
            }
            MutationAction::SetClearMutations => {
                next.clear_multiselect = true;
                next.clear_input = true;
                next.clear_selection = true;
            }
            MutationAction::UnsetClearMutations => {
                next.clear_multiselect = false;
                next.clear_input = false;
                next.clear_selection = false;
            }
            MutationAction::SetClearMultiselect => next.clear_multiselect = true,
            MutationAction::UnsetClearMultiselect => next.clear_multiselect = false,
            MutationAction::SetClearInput => next.clear_input = true,
            MutationAction::UnsetClearInput => next.clear_input = false,
            MutationAction::SetClearSelection => next.clear_selection = true,
            MutationAction::UnsetClearSelection => next.clear_selection = false,
        }
        next
    }

    /// True when moving from `self` to `next` obligates a server refetch:
    /// only the server-side filters count, never the clear flags.
    pub fn requires_refetch(&self, next: &MutationState) -> bool {
        self.status != next.status || self.time_range_hours != next.time_range_hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_targets_active_alerts() {
        let state = MutationState::default();
        assert_eq!(state.status, BTreeSet::from([AlertStatus::Active]));
        assert_eq!(state.time_range_hours, None);
        assert!(!state.clear_multiselect && !state.clear_input && !state.clear_selection);
    }

    #[test]
    fn test_set_status_arms_clear_cycle_and_obligates_fetch() {
        let state = MutationState::default();
        let next = state
            .reduce(MutationAction::SetStatus(vec![AlertStatus::Active, AlertStatus::Suppressed]))
            .reduce(MutationAction::SetClearMutations);

        assert!(state.requires_refetch(&next));
        assert!(next.clear_multiselect && next.clear_input && next.clear_selection);

        // Each widget disarms only its own flag
        let next = next.reduce(MutationAction::UnsetClearInput);
        assert!(!next.clear_input);
        assert!(next.clear_multiselect && next.clear_selection);

        let next = next
            .reduce(MutationAction::UnsetClearMultiselect)
            .reduce(MutationAction::UnsetClearSelection);
        assert!(!next.clear_multiselect && !next.clear_selection);
    }

    #[test]
    fn test_time_range_change_obligates_fetch() {
        let state = MutationState::default();
        let next = state.reduce(MutationAction::SetTimeRange(Some(24)));
        assert!(state.requires_refetch(&next));

        let same = next.reduce(MutationAction::SetTimeRange(Some(24)));
        assert!(!next.requires_refetch(&same));
    }

    #[test]
    fn test_clear_flags_do_not_obligate_fetch() {
        let state = MutationState::default();
        let armed = state.reduce(MutationAction::SetClearMutations);
        assert!(!state.requires_refetch(&armed));
    }

    #[test]
    fn test_flags_are_edge_triggered_per_arm_cycle() {
        // Arm, disarm one widget, re-arm: the disarmed flag comes back up
        let state = MutationState::default()
            .reduce(MutationAction::SetClearMutations)
            .reduce(MutationAction::UnsetClearInput);
        assert!(!state.clear_input);

        let rearmed = state.reduce(MutationAction::SetClearMutations);
        assert!(rearmed.clear_input && rearmed.clear_multiselect && rearmed.clear_selection);
    }

    #[test]
    fn test_set_status_deduplicates() {
        let state = MutationState::default().reduce(MutationAction::SetStatus(vec![
            AlertStatus::Cleared,
            AlertStatus::Cleared,
            AlertStatus::Active,
        ]));
        assert_eq!(state.status, BTreeSet::from([AlertStatus::Active, AlertStatus::Cleared]));
    }
}
