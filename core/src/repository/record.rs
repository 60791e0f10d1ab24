use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::model::tags::{serialize_joined, Tags};
use crate::model::task::{Priority, Status, Task};

/// On-disk shape of a task. Tags are written comma-joined and read in
/// either shape, so this is the only place the two forms meet.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, serialize_with = "serialize_joined")]
    pub tags: Tags,
    pub created_at: DateTime<Utc>,
}

/// Shown for records whose title was blanked outside the app.
pub const UNTITLED: &str = "Untitled task";

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        let title = if record.title.trim().is_empty() {
            warn!(id = %record.id, "stored task has an empty title");
            UNTITLED.to_string()
        } else {
            record.title
        };
        Task {
            id: record.id,
            title,
            description: record.description,
            status: record.status,
            priority: record.priority,
            due_date: record.due_date,
            tags: record.tags,
            created_at: record.created_at,
        }
    }
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        TaskRecord {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            due_date: task.due_date,
            tags: task.tags.clone(),
            created_at: task.created_at,
        }
    }
}
