use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::task::TaskStatus;

/// Deadline windows offered by the filter UI, in days until due.
pub const TIME_WINDOWS: [i64; 3] = [7, 14, 21];

/// Human labels for the deadline windows, paired with `TIME_WINDOWS`.
pub fn window_label(days: i64) -> String {
    let weeks = days / 7;
    if weeks == 1 {
        "Tasks within 1 week".to_string()
    } else {
        format!("Tasks within {} weeks", weeks)
    }
}

/// Pure predicate state gating which tasks are visible. Never mutates the
/// task store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    /// Selected statuses; empty = match all.
    #[serde(default)]
    pub statuses: BTreeSet<TaskStatus>,
    /// Selected deadline windows in days-until-due; empty = match all.
    #[serde(default)]
    pub windows: BTreeSet<i64>,
    /// Free-text query matched against name and title; empty = match all.
    #[serde(default)]
    pub query: String,
}

impl FilterState {
    /// True when no filter is selected at all (the full set is shown).
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty() && self.windows.is_empty() && self.query.is_empty()
    }

    pub fn toggle_status(&mut self, status: TaskStatus) {
        if !self.statuses.remove(&status) {
            self.statuses.insert(status);
        }
    }

    pub fn toggle_window(&mut self, days: i64) {
        if !self.windows.remove(&days) {
            self.windows.insert(days);
        }
    }

    pub fn clear(&mut self) {
        *self = FilterState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_flip_membership() {
        let mut f = FilterState::default();
        assert!(f.is_empty());

        f.toggle_status(TaskStatus::Review);
        assert!(f.statuses.contains(&TaskStatus::Review));
        f.toggle_status(TaskStatus::Review);
        assert!(!f.statuses.contains(&TaskStatus::Review));

        f.toggle_window(7);
        f.toggle_window(14);
        f.toggle_window(7);
        assert_eq!(f.windows.iter().copied().collect::<Vec<_>>(), vec![14]);
    }

    #[test]
    fn clear_resets_everything() {
        let mut f = FilterState::default();
        f.toggle_status(TaskStatus::ToDo);
        f.toggle_window(21);
        f.query = "deploy".into();
        f.clear();
        assert!(f.is_empty());
    }

    #[test]
    fn window_labels() {
        assert_eq!(window_label(7), "Tasks within 1 week");
        assert_eq!(window_label(14), "Tasks within 2 weeks");
        assert_eq!(window_label(21), "Tasks within 3 weeks");
    }
}
