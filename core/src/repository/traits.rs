use uuid::Uuid;

use crate::error::Result;
use crate::model::filter::TaskFilter;
use crate::model::task::{Task, TaskDraft};

/// The record store behind the board. Backends assign ids and creation
/// timestamps; everything else comes from the caller's draft.
pub trait TaskRepository {
    /// Matching tasks, newest-created first. Never fails just because nothing matched.
    fn fetch(&self, filter: &TaskFilter) -> Result<Vec<Task>>;

    fn get(&self, id: &Uuid) -> Result<Task>;

    /// Fails with a validation error when the title is missing.
    fn create(&self, draft: TaskDraft) -> Result<Task>;

    /// Fails with `NotFound` for an unknown id.
    fn update(&self, id: &Uuid, draft: TaskDraft) -> Result<Task>;

    /// Fails with `NotFound` for an unknown id; afterwards the id is gone from `fetch`.
    fn delete(&self, id: &Uuid) -> Result<bool>;
}
