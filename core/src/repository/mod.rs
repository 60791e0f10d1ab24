pub mod file;
pub mod memory;
pub mod record;
pub mod traits;

pub use file::FileTaskRepository;
pub use memory::InMemoryTaskRepository;
pub use record::TaskRecord;
pub use traits::TaskRepository;

use crate::model::filter::TaskFilter;
use crate::model::task::Task;

/// Fetch ordering shared by the backends: later insertions win creation-time ties.
pub(crate) fn newest_first(tasks: Vec<Task>, filter: &TaskFilter) -> Vec<Task> {
    let mut matching: Vec<Task> = tasks.into_iter().rev().filter(|t| filter.matches(t)).collect();
    matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    matching
}
