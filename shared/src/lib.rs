use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A to-do item as stored by the backend. The client only ever holds a
/// transient copy of these; the backend remains authoritative and the
/// client re-fetches after every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl Task {
    /// A task counts as overdue once its due date has passed and it is
    /// still open. Completed tasks are never overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => due < today && !self.completed,
            None => false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub due_date: Option<NaiveDate>,
}

/// Full replacement of the mutable fields. `due_date` is always present in
/// the serialized body, as `null` when the task has none.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: String,
    pub completed: bool,
    pub due_date: Option<NaiveDate>,
}

/// Which subset of the collection the list view shows. Progress is always
/// computed over the full collection, regardless of the active filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Completed,
    Incomplete,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Completed, Filter::Incomplete];

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Completed => task.completed,
            Filter::Incomplete => !task.completed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Completed => "Completed",
            Filter::Incomplete => "Incomplete",
        }
    }
}

/// Aggregate completion state of the whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn of(tasks: &[Task]) -> Self {
        Self {
            completed: tasks.iter().filter(|t| t.completed).count(),
            total: tasks.len(),
        }
    }

    /// Rounded completion percentage; 0 for an empty collection.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            0
        } else {
            ((self.completed as f64 / self.total as f64) * 100.0).round() as u32
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} of {} tasks completed ({}%)",
            self.completed,
            self.total,
            self.percent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str, completed: bool, due: Option<&str>) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            completed,
            due_date: due.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task("write report", false, None),
            task("pay rent", true, Some("2026-08-01")),
            task("buy milk", false, Some("2026-08-30")),
            task("call dentist", true, None),
        ]
    }

    #[test]
    fn filter_all_keeps_every_task() {
        let tasks = sample();
        let visible: Vec<_> = tasks.iter().filter(|t| Filter::All.matches(t)).collect();
        assert_eq!(visible.len(), tasks.len());
    }

    #[test]
    fn filter_completed_keeps_exactly_the_completed_subset() {
        let tasks = sample();
        let visible: Vec<_> = tasks
            .iter()
            .filter(|t| Filter::Completed.matches(t))
            .collect();
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|t| t.completed));
    }

    #[test]
    fn filter_incomplete_keeps_exactly_the_open_subset() {
        let tasks = sample();
        let visible: Vec<_> = tasks
            .iter()
            .filter(|t| Filter::Incomplete.matches(t))
            .collect();
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|t| !t.completed));
    }

    #[test]
    fn every_task_matches_exactly_one_of_completed_or_incomplete() {
        for t in sample() {
            assert!(Filter::All.matches(&t));
            assert_ne!(Filter::Completed.matches(&t), Filter::Incomplete.matches(&t));
        }
    }

    #[test]
    fn progress_is_zero_for_an_empty_collection() {
        let progress = Progress::of(&[]);
        assert_eq!(progress.percent(), 0);
        assert_eq!(progress.summary(), "0 of 0 tasks completed (0%)");
    }

    #[test]
    fn progress_percent_rounds() {
        assert_eq!(Progress { completed: 2, total: 4 }.percent(), 50);
        assert_eq!(Progress { completed: 1, total: 3 }.percent(), 33);
        assert_eq!(Progress { completed: 2, total: 3 }.percent(), 67);
    }

    #[test]
    fn progress_counts_the_unfiltered_collection() {
        let progress = Progress::of(&sample());
        assert_eq!(progress.completed, 2);
        assert_eq!(progress.total, 4);
        assert_eq!(progress.summary(), "2 of 4 tasks completed (50%)");
    }

    #[test]
    fn open_task_with_past_due_date_is_overdue() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let t = task("pay rent", false, Some("2026-08-01"));
        assert!(t.is_overdue(today));
    }

    #[test]
    fn completed_task_is_never_overdue() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let t = task("pay rent", true, Some("2026-08-01"));
        assert!(!t.is_overdue(today));
    }

    #[test]
    fn future_or_missing_due_dates_are_not_overdue() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        assert!(!task("buy milk", false, Some("2026-08-30")).is_overdue(today));
        assert!(!task("due today", false, Some("2026-08-24")).is_overdue(today));
        assert!(!task("no date", false, None).is_overdue(today));
    }

    #[test]
    fn task_parses_null_and_iso_due_dates() {
        let json = r#"{"id":"6e5e47a8-7f22-4c9f-9a6a-0d1f0cbe2f11","title":"a","completed":false,"due_date":null}"#;
        let t: Task = serde_json::from_str(json).unwrap();
        assert_eq!(t.due_date, None);

        let json = r#"{"id":"6e5e47a8-7f22-4c9f-9a6a-0d1f0cbe2f11","title":"a","completed":true,"due_date":"2026-01-15"}"#;
        let t: Task = serde_json::from_str(json).unwrap();
        assert_eq!(t.due_date, NaiveDate::from_ymd_opt(2026, 1, 15));
    }

    #[test]
    fn task_due_date_defaults_to_none_when_absent() {
        let json = r#"{"id":"6e5e47a8-7f22-4c9f-9a6a-0d1f0cbe2f11","title":"a","completed":false}"#;
        let t: Task = serde_json::from_str(json).unwrap();
        assert_eq!(t.due_date, None);
    }

    #[test]
    fn create_request_sends_explicit_null_for_missing_due_date() {
        let body = serde_json::to_value(CreateTaskRequest {
            title: "Buy milk".to_string(),
            due_date: None,
        })
        .unwrap();
        assert!(body["due_date"].is_null());
        assert_eq!(body["title"], "Buy milk");
    }

    #[test]
    fn update_request_serializes_all_mutable_fields() {
        let body = serde_json::to_value(UpdateTaskRequest {
            title: "pay rent".to_string(),
            completed: true,
            due_date: NaiveDate::from_ymd_opt(2026, 8, 1),
        })
        .unwrap();
        assert_eq!(body["title"], "pay rent");
        assert_eq!(body["completed"], true);
        assert_eq!(body["due_date"], "2026-08-01");
    }
}
