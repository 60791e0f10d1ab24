use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::model::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Title,
    Status,
    Priority,
    DueDate,
}

impl SortColumn {
    pub const ALL: [SortColumn; 4] = [
        SortColumn::Title,
        SortColumn::Status,
        SortColumn::Priority,
        SortColumn::DueDate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortColumn::Title => "Title",
            SortColumn::Status => "Status",
            SortColumn::Priority => "Priority",
            SortColumn::DueDate => "Due Date",
        }
    }

    fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortColumn::Title => a.title.cmp(&b.title),
            SortColumn::Status => a.status.cmp(&b.status),
            SortColumn::Priority => a.priority.cmp(&b.priority),
            // None < Some(_): an unset due date sorts as the earliest date.
            SortColumn::DueDate => a.due_date.cmp(&b.due_date),
        }
    }
}

impl FromStr for SortColumn {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(SortColumn::Title),
            "status" => Ok(SortColumn::Status),
            "priority" | "pri" => Ok(SortColumn::Priority),
            "due" | "due-date" | "duedate" => Ok(SortColumn::DueDate),
            _ => Err(ValidationError::UnknownSortColumn(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            column: SortColumn::DueDate,
            direction: SortDirection::Ascending,
        }
    }
}

impl SortConfig {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Header click semantics: the current ascending column flips to
    /// descending, anything else becomes the new ascending column.
    pub fn toggle(self, column: SortColumn) -> Self {
        let direction = if self.column == column && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        Self { column, direction }
    }
}

impl fmt::Display for SortConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column.label(), self.direction.arrow())
    }
}

/// Stable: tasks with equal keys keep their relative order in both directions.
pub fn sort_tasks<T: Borrow<Task>>(tasks: &mut [T], config: SortConfig) {
    tasks.sort_by(|a, b| {
        let ord = config.column.compare(a.borrow(), b.borrow());
        match config.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}
