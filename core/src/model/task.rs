use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::model::tags::Tags;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "h" | "high" => Ok(Priority::High),
            "m" | "med" | "medium" => Ok(Priority::Medium),
            "l" | "low" => Ok(Priority::Low),
            _ => Err(ValidationError::UnknownPriority(s.to_string())),
        }
    }
}

/// Column a task sits in on the board. Declaration order is board order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Backward,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Todo, Status::InProgress, Status::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in-progress",
            Status::Completed => "completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Todo => "To Do",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
        }
    }

    pub fn next(self) -> Option<Status> {
        match self {
            Status::Todo => Some(Status::InProgress),
            Status::InProgress => Some(Status::Completed),
            Status::Completed => None,
        }
    }

    pub fn previous(self) -> Option<Status> {
        match self {
            Status::Todo => None,
            Status::InProgress => Some(Status::Todo),
            Status::Completed => Some(Status::InProgress),
        }
    }

    /// `None` when the task is already in the first/last column.
    pub fn step(self, direction: MoveDirection) -> Option<Status> {
        match direction {
            MoveDirection::Forward => self.next(),
            MoveDirection::Backward => self.previous(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "t" | "todo" | "to-do" => Ok(Status::Todo),
            "i" | "in-progress" | "in_progress" | "inprogress" | "progress" => Ok(Status::InProgress),
            "c" | "completed" | "done" => Ok(Status::Completed),
            _ => Err(ValidationError::UnknownStatus(s.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Tags,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Builds a stored task from a draft. Only storage backends assign ids.
    pub fn from_draft(id: Uuid, created_at: DateTime<Utc>, draft: TaskDraft) -> Self {
        let draft = draft.normalized();
        Self {
            id,
            title: draft.title,
            description: draft.description,
            status: draft.status,
            priority: draft.priority,
            due_date: draft.due_date,
            tags: draft.tags,
            created_at,
        }
    }

    /// Overwrites every editable field; `id` and `created_at` are kept.
    pub fn apply(&mut self, draft: TaskDraft) {
        let draft = draft.normalized();
        self.title = draft.title;
        self.description = draft.description;
        self.status = draft.status;
        self.priority = draft.priority;
        self.due_date = draft.due_date;
        self.tags = draft.tags;
    }

    pub fn short_id(&self) -> String {
        self.id.to_string()[..8].to_string()
    }
}

/// The editable fields of a task, as submitted by a form or the command line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: Status,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub tags: Tags,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// Trims the title and turns a blank description into `None`.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self
    }
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            due_date: task.due_date,
            tags: task.tags.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_steps_stop_at_the_ends() {
        assert_eq!(Status::Todo.step(MoveDirection::Forward), Some(Status::InProgress));
        assert_eq!(Status::InProgress.step(MoveDirection::Forward), Some(Status::Completed));
        assert_eq!(Status::Completed.step(MoveDirection::Forward), None);
        assert_eq!(Status::Completed.step(MoveDirection::Backward), Some(Status::InProgress));
        assert_eq!(Status::Todo.step(MoveDirection::Backward), None);
    }

    #[test]
    fn test_status_and_priority_reject_unknown_values() {
        assert_eq!("in-progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("Done".parse::<Status>().unwrap(), Status::Completed);
        assert!("blocked".parse::<Status>().is_err());

        assert_eq!("H".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("med".parse::<Priority>().unwrap(), Priority::Medium);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, "\"high\"");
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        assert_eq!(TaskDraft::new("   ").validate(), Err(ValidationError::EmptyTitle));
        assert!(TaskDraft::new("Write spec").validate().is_ok());
    }

    #[test]
    fn test_apply_keeps_identity() {
        let id = Uuid::new_v4();
        let created_at = Utc::now();
        let mut task = Task::from_draft(id, created_at, TaskDraft::new("  Draft  ").with_description(" "));
        assert_eq!(task.title, "Draft");
        assert_eq!(task.description, None);

        task.apply(TaskDraft::new("Final").with_priority(Priority::High));
        assert_eq!(task.id, id);
        assert_eq!(task.created_at, created_at);
        assert_eq!(task.title, "Final");
        assert_eq!(task.priority, Priority::High);
    }
}
