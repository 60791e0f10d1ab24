use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};

use crate::error::ValidationError;
use crate::model::task::{Priority, Status, Task};

/// Predicates a fetch is narrowed by. Absent fields match everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskFilter {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub search_term: Option<String>,
}

impl TaskFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|s| s != task.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != task.priority) {
            return false;
        }
        match self.search_term.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => matches_search(task, &term.to_lowercase()),
        }
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}

/// Case-insensitive containment in title, description or any tag.
/// `needle` must already be lowercase.
fn matches_search(task: &Task, needle: &str) -> bool {
    task.title.to_lowercase().contains(needle)
        || task
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
        || task.tags.any_contains_lowercase(needle)
}

/// The filter selector shown above the board and list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveFilter {
    #[default]
    All,
    Today,
    HighPriority,
    Status(Status),
}

impl ActiveFilter {
    const CYCLE: [ActiveFilter; 6] = [
        ActiveFilter::All,
        ActiveFilter::Status(Status::Todo),
        ActiveFilter::Status(Status::InProgress),
        ActiveFilter::Status(Status::Completed),
        ActiveFilter::HighPriority,
        ActiveFilter::Today,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ActiveFilter::All => "All Tasks",
            ActiveFilter::Today => "Due Today",
            ActiveFilter::HighPriority => "High Priority",
            ActiveFilter::Status(status) => status.label(),
        }
    }

    /// Next entry of the selector, wrapping around.
    pub fn cycle(self) -> ActiveFilter {
        let pos = Self::CYCLE.iter().position(|f| *f == self).unwrap_or(0);
        Self::CYCLE[(pos + 1) % Self::CYCLE.len()]
    }

    /// The part of this selection a storage backend can evaluate.
    /// `Today` depends on the local clock and is checked with [`ActiveFilter::matches_on`].
    pub fn to_task_filter(self, search_term: &str) -> TaskFilter {
        let mut filter = TaskFilter::all();
        match self {
            ActiveFilter::Status(status) => filter.status = Some(status),
            ActiveFilter::HighPriority => filter.priority = Some(Priority::High),
            ActiveFilter::All | ActiveFilter::Today => {}
        }
        if !search_term.trim().is_empty() {
            filter.search_term = Some(search_term.to_string());
        }
        filter
    }

    pub fn matches_on(self, task: &Task, today: NaiveDate) -> bool {
        match self {
            ActiveFilter::All => true,
            ActiveFilter::Today => task.due_date == Some(today),
            ActiveFilter::HighPriority => task.priority == Priority::High,
            ActiveFilter::Status(status) => task.status == status,
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        self.matches_on(task, Local::now().date_naive())
    }
}

impl fmt::Display for ActiveFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveFilter::All => f.write_str("all"),
            ActiveFilter::Today => f.write_str("today"),
            ActiveFilter::HighPriority => f.write_str("high-priority"),
            ActiveFilter::Status(status) => write!(f, "{}", status),
        }
    }
}

impl FromStr for ActiveFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(ActiveFilter::All),
            "today" => Ok(ActiveFilter::Today),
            "high-priority" | "high" => Ok(ActiveFilter::HighPriority),
            other => other.parse::<Status>().map(ActiveFilter::Status),
        }
    }
}

/// Applies the selector and search term to an already-fetched list.
pub fn visible_tasks<'a>(
    tasks: &'a [Task],
    active: ActiveFilter,
    search_term: &str,
    today: NaiveDate,
) -> Vec<&'a Task> {
    let filter = active.to_task_filter(search_term);
    tasks
        .iter()
        .filter(|t| filter.matches(t) && active.matches_on(t, today))
        .collect()
}
