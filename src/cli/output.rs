use serde::Serialize;

use crate::model::task::{Task, TaskStatus};
use crate::ops::date_ops::format_day;
use crate::ops::placement::ChipLayout;
use crate::ops::search::SearchHit;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub name: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    pub start: String,
    pub end: String,
    pub days: i64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_new: bool,
}

#[derive(Serialize)]
pub struct DayJson {
    pub day: String,
    pub tasks: Vec<DayTaskJson>,
}

#[derive(Serialize)]
pub struct DayTaskJson {
    #[serde(flatten)]
    pub task: TaskJson,
    /// Stacking position within the day (0 = top)
    pub position: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_offset: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chip_width: Option<f64>,
}

#[derive(Serialize)]
pub struct SearchHitJson {
    pub task_id: String,
    pub field: &'static str,
    pub spans: Vec<[usize; 2]>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id.clone(),
        name: task.name.clone(),
        title: task.title.clone(),
        status: task.status.map(TaskStatus::label),
        start: format_day(task.start),
        end: format_day(task.end),
        days: task.days_spanned(),
        is_new: task.is_new,
    }
}

pub fn hit_to_json(hit: &SearchHit) -> SearchHitJson {
    SearchHitJson {
        task_id: hit.task_id.clone(),
        field: hit.field.label(),
        spans: hit.spans.iter().map(|r| [r.start, r.end]).collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn status_char(status: Option<TaskStatus>) -> char {
    match status {
        None => ' ',
        Some(TaskStatus::ToDo) => '○',
        Some(TaskStatus::InProgress) => '▸',
        Some(TaskStatus::Review) => '◇',
        Some(TaskStatus::Completed) => '✓',
    }
}

/// Format a single task as a one-line summary
pub fn format_task_line(task: &Task) -> String {
    let range = if task.is_single_day() {
        format_day(task.start)
    } else {
        format!("{}..{}", format_day(task.start), format_day(task.end))
    };
    format!(
        "[{}] {}  {}  {}",
        status_char(task.status),
        task.id,
        range,
        task.label()
    )
}

/// Format detailed task view
pub fn format_task_detail(task: &Task) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "[{}] {}  {}",
        status_char(task.status),
        task.id,
        task.label()
    ));
    if let Some(status) = task.status {
        lines.push(format!("status: {}", status.label()));
    }
    lines.push(format!("start: {}", format_day(task.start)));
    lines.push(format!("end: {}", format_day(task.end)));
    lines.push(format!("days: {}", task.days_spanned()));
    if task.is_new {
        lines.push("unsaved: created but never named".to_string());
    }
    lines
}

/// Format one day's stack, top to bottom, with chip geometry
pub fn format_day_listing(day_label: &str, chips: &[(&Task, Option<ChipLayout>)]) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("== {} ==", day_label));
    if chips.is_empty() {
        lines.push("(no tasks)".to_string());
        return lines;
    }
    for (task, chip) in chips {
        let mut line = format!("  {}", format_task_line(task));
        if let Some(chip) = chip {
            line.push_str(&format!("  @{:.0}px w{:.0}", chip.top_offset, chip.width));
        } else {
            line.push_str("  (carried over)");
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::store_ops::{apply_modal_save, create_task_on_day, update_range};

    #[test]
    fn task_line_shows_status_and_range() {
        let mut tasks = Vec::new();
        let id = create_task_on_day(&mut tasks, "2024-06-03".parse().unwrap(), 120.0);
        apply_modal_save(&mut tasks, &id, "ship release", TaskStatus::InProgress).unwrap();
        update_range(
            &mut tasks,
            &id,
            "2024-06-03".parse().unwrap(),
            "2024-06-05".parse().unwrap(),
        )
        .unwrap();

        assert_eq!(
            format_task_line(&tasks[0]),
            "[▸] task-1  2024-06-03..2024-06-05  ship release"
        );
    }

    #[test]
    fn unsaved_task_json_marks_is_new() {
        let mut tasks = Vec::new();
        create_task_on_day(&mut tasks, "2024-06-03".parse().unwrap(), 120.0);
        let json = serde_json::to_value(task_to_json(&tasks[0])).unwrap();
        assert_eq!(json["is_new"], true);
        assert_eq!(json["title"], "New Task");
        assert!(json.get("status").is_none());
    }
}
