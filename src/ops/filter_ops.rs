use chrono::NaiveDate;

use crate::model::filter::FilterState;
use crate::model::task::Task;

/// Apply the filter state over the task set.
///
/// The result is the intersection of three independent predicates, each of
/// which matches everything when its selection is empty. With no filter
/// selected at all this is the full unfiltered set, never an empty
/// intersection.
pub fn visible_tasks<'a>(tasks: &'a [Task], filters: &FilterState, today: NaiveDate) -> Vec<&'a Task> {
    if filters.is_empty() {
        return tasks.iter().collect();
    }
    tasks
        .iter()
        .filter(|t| matches_filters(t, filters, today))
        .collect()
}

/// Whether one task passes every active predicate.
pub fn matches_filters(task: &Task, filters: &FilterState, today: NaiveDate) -> bool {
    let status_match = filters.statuses.is_empty()
        || task
            .status
            .map(|s| filters.statuses.contains(&s))
            .unwrap_or(false);

    // Due date is `end` (falling back to `start` is moot here: `end` always
    // exists and `start <= end`). A window w matches when the task is due
    // within 0..=w whole days from today.
    let time_match = filters.windows.is_empty() || {
        let days_until_due = (task.end - today).num_days();
        filters
            .windows
            .iter()
            .any(|w| days_until_due >= 0 && days_until_due <= *w)
    };

    let text_match = filters.query.trim().is_empty() || {
        let query = filters.query.trim().to_lowercase();
        task.name.to_lowercase().contains(&query) || task.title.to_lowercase().contains(&query)
    };

    status_match && time_match && text_match
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskStatus;
    use crate::ops::store_ops::{apply_modal_save, create_task_on_day, update_range};

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn sample_tasks() -> Vec<Task> {
        let mut tasks = Vec::new();
        let today = day("2024-06-03");
        for (name, status, due) in [
            ("write report", TaskStatus::ToDo, "2024-06-10"), // due in 7
            ("review PR", TaskStatus::Review, "2024-06-11"),  // due in 8
            ("deploy service", TaskStatus::InProgress, "2024-06-03"), // due today
            ("retro notes", TaskStatus::Completed, "2024-06-01"), // overdue
        ] {
            let id = create_task_on_day(&mut tasks, today, 120.0);
            apply_modal_save(&mut tasks, &id, name, status).unwrap();
            update_range(&mut tasks, &id, today.min(day(due)), day(due)).unwrap();
        }
        tasks
    }

    fn ids(tasks: Vec<&Task>) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn no_selection_shows_everything() {
        let tasks = sample_tasks();
        let filters = FilterState::default();
        assert_eq!(
            visible_tasks(&tasks, &filters, day("2024-06-03")).len(),
            tasks.len()
        );
    }

    #[test]
    fn status_filter_selects_members() {
        let tasks = sample_tasks();
        let mut filters = FilterState::default();
        filters.toggle_status(TaskStatus::Review);
        filters.toggle_status(TaskStatus::Completed);
        assert_eq!(
            ids(visible_tasks(&tasks, &filters, day("2024-06-03"))),
            vec!["task-2", "task-4"]
        );
    }

    #[test]
    fn unset_status_never_matches_a_status_selection() {
        let mut tasks = sample_tasks();
        create_task_on_day(&mut tasks, day("2024-06-03"), 120.0); // status None
        let mut filters = FilterState::default();
        filters.toggle_status(TaskStatus::ToDo);
        assert_eq!(
            ids(visible_tasks(&tasks, &filters, day("2024-06-03"))),
            vec!["task-1"]
        );
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let tasks = sample_tasks();
        let mut filters = FilterState::default();
        filters.toggle_window(7);
        let visible = ids(visible_tasks(&tasks, &filters, day("2024-06-03")));
        // due in exactly 7 days: included; due in 8: excluded; overdue: excluded
        assert!(visible.contains(&"task-1"));
        assert!(!visible.contains(&"task-2"));
        assert!(visible.contains(&"task-3")); // due today (0 days)
        assert!(!visible.contains(&"task-4"));
    }

    #[test]
    fn text_match_is_case_insensitive_substring() {
        let tasks = sample_tasks();
        let mut filters = FilterState::default();
        filters.query = "  REPORT ".into();
        assert_eq!(
            ids(visible_tasks(&tasks, &filters, day("2024-06-03"))),
            vec!["task-1"]
        );
    }

    #[test]
    fn predicates_intersect() {
        let tasks = sample_tasks();
        let mut filters = FilterState::default();
        filters.toggle_status(TaskStatus::ToDo);
        filters.toggle_status(TaskStatus::Review);
        filters.toggle_window(14);
        filters.query = "re".into();
        // report: ToDo, due 7, contains "re" -> in
        // review PR: Review, due 8, contains "re" -> in
        // deploy: wrong status -> out; retro: wrong status -> out
        assert_eq!(
            ids(visible_tasks(&tasks, &filters, day("2024-06-03"))),
            vec!["task-1", "task-2"]
        );
    }
}
