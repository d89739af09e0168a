use chrono::NaiveDate;

use crate::model::task::{Task, TaskStatus};

/// Error type for task store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("task name must not be empty")]
    EmptyName,
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

pub fn find_task<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    tasks.iter().find(|t| t.id == id)
}

pub fn find_task_mut<'a>(tasks: &'a mut [Task], id: &str) -> Option<&'a mut Task> {
    tasks.iter_mut().find(|t| t.id == id)
}

/// Next free `task-N` id: one past the highest numeric suffix in the store.
fn next_task_id(tasks: &[Task]) -> String {
    let mut max = 0usize;
    for task in tasks {
        if let Some(num_str) = task.id.strip_prefix("task-")
            && let Ok(n) = num_str.parse::<usize>()
            && n > max
        {
            max = n;
        }
    }
    format!("task-{}", max + 1)
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Create a single-day task on `day` and append it to the store.
/// Returns the new task's id.
pub fn create_task_on_day(tasks: &mut Vec<Task>, day: NaiveDate, cell_width: f64) -> String {
    let id = next_task_id(tasks);
    tasks.push(Task::new_on_day(id.clone(), day, cell_width));
    id
}

/// Modal save: set name/title and status, always clear `is_new`.
/// Refused when the name is empty (the modal's save stays disabled; this is
/// the same rule enforced at the store boundary).
pub fn apply_modal_save(
    tasks: &mut [Task],
    id: &str,
    name: &str,
    status: TaskStatus,
) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::EmptyName);
    }
    let task = find_task_mut(tasks, id).ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    task.name = name.to_string();
    task.title = name.to_string();
    task.status = Some(status);
    task.is_new = false;
    Ok(())
}

/// Set just the status (CLI path; does not touch `is_new`).
pub fn set_status(tasks: &mut [Task], id: &str, status: TaskStatus) -> Result<(), StoreError> {
    let task = find_task_mut(tasks, id).ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    task.status = Some(status);
    Ok(())
}

/// Rename a task, keeping `title` in sync.
pub fn rename_task(tasks: &mut [Task], id: &str, name: &str) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::EmptyName);
    }
    let task = find_task_mut(tasks, id).ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    task.name = name.to_string();
    task.title = name.to_string();
    Ok(())
}

/// Drag/resize commit: replace the date range. Inverted endpoints are
/// swapped so `start <= end` always holds; `width` is recomputed from the
/// committed span.
pub fn update_range(
    tasks: &mut [Task],
    id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), StoreError> {
    let task = find_task_mut(tasks, id).ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    let (start, end) = if end < start { (end, start) } else { (start, end) };
    task.start = start;
    task.end = end;
    task.width = task.days_spanned() as f64 * task.single_day_width;
    Ok(())
}

/// Shift the whole range by `delta_days`, preserving the span exactly.
pub fn shift_task(tasks: &mut [Task], id: &str, delta_days: i64) -> Result<(), StoreError> {
    let task = find_task(tasks, id).ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    let start = task.start + chrono::Duration::days(delta_days);
    let end = task.end + chrono::Duration::days(delta_days);
    update_range(tasks, id, start, end)
}
