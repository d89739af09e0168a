use std::ops::Range;

use regex::Regex;

use crate::model::task::Task;

/// Which field of a task matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Id,
    Name,
    Title,
    Status,
}

impl MatchField {
    pub fn label(self) -> &'static str {
        match self {
            MatchField::Id => "id",
            MatchField::Name => "name",
            MatchField::Title => "title",
            MatchField::Status => "status",
        }
    }
}

/// A search hit for a task field
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub task_id: String,
    pub field: MatchField,
    pub spans: Vec<Range<usize>>,
}

/// Collect all non-overlapping match byte-ranges for a regex in the text.
fn find_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}

/// Search every task's id, name, title, and status label.
pub fn search_tasks(tasks: &[Task], re: &Regex) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    for task in tasks {
        let mut push = |field: MatchField, text: &str| {
            let spans = find_matches(re, text);
            if !spans.is_empty() {
                hits.push(SearchHit {
                    task_id: task.id.clone(),
                    field,
                    spans,
                });
            }
        };

        push(MatchField::Id, &task.id);
        push(MatchField::Name, &task.name);
        // The title is usually a copy of the name; only report it when it
        // actually differs (new tasks carry a placeholder title).
        if task.title != task.name {
            push(MatchField::Title, &task.title);
        }
        if let Some(status) = task.status {
            push(MatchField::Status, status.label());
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskStatus;
    use crate::ops::store_ops::{apply_modal_save, create_task_on_day};

    fn sample_tasks() -> Vec<Task> {
        let mut tasks = Vec::new();
        let day = "2024-06-03".parse().unwrap();
        let a = create_task_on_day(&mut tasks, day, 120.0);
        apply_modal_save(&mut tasks, &a, "fix login bug", TaskStatus::InProgress).unwrap();
        let b = create_task_on_day(&mut tasks, day, 120.0);
        apply_modal_save(&mut tasks, &b, "update docs", TaskStatus::ToDo).unwrap();
        tasks
    }

    #[test]
    fn matches_name_with_spans() {
        let tasks = sample_tasks();
        let re = Regex::new("log.n").unwrap();
        let hits = search_tasks(&tasks, &re);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].task_id, "task-1");
        assert_eq!(hits[0].field, MatchField::Name);
        assert_eq!(hits[0].spans, vec![4..9]);
    }

    #[test]
    fn matches_status_label() {
        let tasks = sample_tasks();
        let re = Regex::new("(?i)progress").unwrap();
        let hits = search_tasks(&tasks, &re);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].field, MatchField::Status);
    }

    #[test]
    fn matches_placeholder_title_on_new_tasks() {
        let mut tasks = sample_tasks();
        create_task_on_day(&mut tasks, "2024-06-04".parse().unwrap(), 120.0);
        let re = Regex::new("New Task").unwrap();
        let hits = search_tasks(&tasks, &re);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].task_id, "task-3");
        assert_eq!(hits[0].field, MatchField::Title);
    }

    #[test]
    fn no_match_is_empty() {
        let tasks = sample_tasks();
        let re = Regex::new("nonexistent").unwrap();
        assert!(search_tasks(&tasks, &re).is_empty());
    }
}
