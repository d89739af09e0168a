use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Workflow status of a task. Determines the chip color in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    Review,
    Completed,
}

impl TaskStatus {
    /// All statuses in display order.
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::ToDo,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Completed,
    ];

    /// Display label, also the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Review => "Review",
            TaskStatus::Completed => "Completed",
        }
    }

    /// Parse a label (case-insensitive, punctuation ignored).
    pub fn from_label(s: &str) -> Option<TaskStatus> {
        let norm: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match norm.as_str() {
            "todo" => Some(TaskStatus::ToDo),
            "inprogress" => Some(TaskStatus::InProgress),
            "review" => Some(TaskStatus::Review),
            "completed" | "done" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

/// A schedulable unit of work occupying an inclusive day range on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Stable identifier (`task-N`), assigned at creation, never reassigned.
    pub id: String,
    /// Editable display name.
    pub name: String,
    /// Denormalized label copy, kept in sync with `name` on save.
    pub title: String,
    /// Unset until the first modal save.
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// First day the task occupies (inclusive).
    pub start: NaiveDate,
    /// Last day the task occupies (inclusive). Invariant: `start <= end`.
    pub end: NaiveDate,
    /// True only between creation and the first save.
    #[serde(default)]
    pub is_new: bool,
    /// Current on-screen span in pixels (`days_spanned * single_day_width`).
    pub width: f64,
    /// Pixel width of one grid day-cell at creation time.
    pub single_day_width: f64,
}

impl Task {
    /// Create a single-day task seeded on `day`.
    pub fn new_on_day(id: String, day: NaiveDate, cell_width: f64) -> Self {
        Task {
            id,
            name: String::new(),
            title: "New Task".to_string(),
            status: None,
            start: day,
            end: day,
            is_new: true,
            width: cell_width,
            single_day_width: cell_width,
        }
    }

    /// Number of days the task spans (always >= 1).
    pub fn days_spanned(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Whether the task occupies the given day.
    pub fn is_on_day(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// True when the task covers exactly one day.
    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }

    /// Text shown on the chip.
    pub fn label(&self) -> &str {
        if self.title.is_empty() {
            &self.name
        } else {
            &self.title
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn status_label_round_trip() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::from_label(status.label()), Some(status));
        }
        assert_eq!(
            TaskStatus::from_label("in-progress"),
            Some(TaskStatus::InProgress)
        );
        assert_eq!(TaskStatus::from_label("done"), Some(TaskStatus::Completed));
        assert_eq!(TaskStatus::from_label("someday"), None);
    }

    #[test]
    fn status_serializes_as_display_label() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
    }

    #[test]
    fn new_task_is_single_day_and_new() {
        let t = Task::new_on_day("task-1".into(), day("2024-06-03"), 120.0);
        assert!(t.is_new);
        assert!(t.is_single_day());
        assert_eq!(t.days_spanned(), 1);
        assert_eq!(t.width, 120.0);
        assert_eq!(t.single_day_width, 120.0);
        assert_eq!(t.status, None);
    }

    #[test]
    fn is_on_day_is_inclusive() {
        let mut t = Task::new_on_day("task-1".into(), day("2024-06-03"), 120.0);
        t.end = day("2024-06-05");
        assert!(!t.is_on_day(day("2024-06-02")));
        assert!(t.is_on_day(day("2024-06-03")));
        assert!(t.is_on_day(day("2024-06-04")));
        assert!(t.is_on_day(day("2024-06-05")));
        assert!(!t.is_on_day(day("2024-06-06")));
    }

    #[test]
    fn task_deserializes_without_transient_fields() {
        let t: Task = serde_json::from_str(
            r#"{"id":"task-2","name":"write docs","title":"write docs",
                "start":"2024-06-03","end":"2024-06-04",
                "width":240.0,"single_day_width":120.0}"#,
        )
        .unwrap();
        assert!(!t.is_new);
        assert_eq!(t.status, None);
        assert_eq!(t.days_spanned(), 2);
    }
}
