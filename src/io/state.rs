use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::board::DayOrder;
use crate::model::filter::FilterState;

/// Persisted TUI state (written to .state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiState {
    /// First day of the month being viewed
    #[serde(default)]
    pub month: Option<NaiveDate>,
    /// Day the cursor was on
    #[serde(default)]
    pub cursor_day: Option<NaiveDate>,
    /// Manual per-day stacking order
    #[serde(default)]
    pub day_order: DayOrder,
    /// Active filter selections
    #[serde(default)]
    pub filters: FilterState,
}

/// Read .state.json from the board directory
pub fn read_ui_state(board_dir: &Path) -> Option<UiState> {
    let path = board_dir.join(".state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write .state.json to the board directory
pub fn write_ui_state(board_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = board_dir.join(".state.json");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskStatus;
    use tempfile::TempDir;

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut state = UiState {
            month: Some("2024-06-01".parse().unwrap()),
            cursor_day: Some("2024-06-03".parse().unwrap()),
            ..Default::default()
        };
        state.day_order.insert(
            "2024-06-03".parse().unwrap(),
            vec!["task-2".into(), "task-1".into()],
        );
        state.filters.toggle_status(TaskStatus::InProgress);
        state.filters.toggle_window(14);
        state.filters.query = "deploy".into();

        write_ui_state(dir.path(), &state).unwrap();
        let loaded = read_ui_state(dir.path()).unwrap();

        assert_eq!(loaded.month, Some("2024-06-01".parse().unwrap()));
        assert_eq!(loaded.cursor_day, Some("2024-06-03".parse().unwrap()));
        let order = loaded.day_order.get(&"2024-06-03".parse::<NaiveDate>().unwrap()).unwrap();
        assert_eq!(order, &vec!["task-2".to_string(), "task-1".to_string()]);
        assert!(loaded.filters.statuses.contains(&TaskStatus::InProgress));
        assert!(loaded.filters.windows.contains(&14));
        assert_eq!(loaded.filters.query, "deploy");
    }

    #[test]
    fn read_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn read_malformed_json_returns_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".state.json"), "not json {{{").unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn serde_defaults_on_empty_object() {
        let state: UiState = serde_json::from_str("{}").unwrap();
        assert!(state.month.is_none());
        assert!(state.cursor_day.is_none());
        assert!(state.day_order.is_empty());
        assert!(state.filters.is_empty());
    }
}
