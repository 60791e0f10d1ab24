use std::cell::RefCell;

use chrono::{Duration, Local, Utc};
use uuid::Uuid;

use crate::error::{Result, TaskflowError};
use crate::model::filter::TaskFilter;
use crate::model::tags::Tags;
use crate::model::task::{Priority, Status, Task, TaskDraft};
use crate::repository::newest_first;
use crate::repository::traits::TaskRepository;

/// Same contract as the file store, held in memory. Nothing is persisted.
#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    tasks: RefCell<Vec<Task>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: RefCell::new(tasks),
        }
    }

    /// A small board to try the UI with.
    pub fn sample() -> Self {
        let today = Local::now().date_naive();
        let now = Utc::now();
        let drafts = [
            TaskDraft::new("Finalize project proposal")
                .with_description("Complete the Q3 project proposal with budget and timeline")
                .with_priority(Priority::High)
                .with_due_date(today + Duration::days(5))
                .with_tags(Tags::from_labels(["work", "planning"])),
            TaskDraft::new("Weekly team meeting")
                .with_description("Discuss project progress and address any roadblocks")
                .with_due_date(today)
                .with_tags(Tags::from_labels(["meeting", "team"])),
            TaskDraft::new("Update design system")
                .with_description("Implement new component variants and documentation")
                .with_status(Status::InProgress)
                .with_due_date(today + Duration::days(10))
                .with_tags(Tags::from_labels(["design", "development"])),
            TaskDraft::new("Prepare monthly report")
                .with_description("Compile metrics and insights for the monthly performance report")
                .with_status(Status::Completed)
                .with_priority(Priority::High)
                .with_due_date(today - Duration::days(5))
                .with_tags(Tags::from_labels(["reporting", "analysis"])),
        ];
        let tasks = drafts
            .into_iter()
            .enumerate()
            .map(|(i, draft)| Task::from_draft(Uuid::new_v4(), now - Duration::minutes(i as i64), draft))
            .collect();
        Self::with_tasks(tasks)
    }
}

impl TaskRepository for InMemoryTaskRepository {
    fn fetch(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        Ok(newest_first(self.tasks.borrow().clone(), filter))
    }

    fn get(&self, id: &Uuid) -> Result<Task> {
        self.tasks
            .borrow()
            .iter()
            .find(|t| t.id == *id)
            .cloned()
            .ok_or(TaskflowError::NotFound(*id))
    }

    fn create(&self, draft: TaskDraft) -> Result<Task> {
        draft.validate()?;
        let task = Task::from_draft(Uuid::new_v4(), Utc::now(), draft);
        self.tasks.borrow_mut().push(task.clone());
        Ok(task)
    }

    fn update(&self, id: &Uuid, draft: TaskDraft) -> Result<Task> {
        draft.validate()?;
        let mut tasks = self.tasks.borrow_mut();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == *id)
            .ok_or(TaskflowError::NotFound(*id))?;
        task.apply(draft);
        Ok(task.clone())
    }

    fn delete(&self, id: &Uuid) -> Result<bool> {
        let mut tasks = self.tasks.borrow_mut();
        let initial_len = tasks.len();
        tasks.retain(|t| t.id != *id);
        if tasks.len() == initial_len {
            return Err(TaskflowError::NotFound(*id));
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_covers_every_column() {
        let repo = InMemoryTaskRepository::sample();
        for status in Status::ALL {
            let found = repo.fetch(&TaskFilter::all().with_status(status)).unwrap();
            assert!(!found.is_empty(), "no sample task in {:?}", status);
        }
        let all = repo.fetch(&TaskFilter::all()).unwrap();
        assert_eq!(all[0].title, "Finalize project proposal");
    }

    #[test]
    fn test_crud_contract() {
        let repo = InMemoryTaskRepository::new();
        let task = repo.create(TaskDraft::new("Write spec")).unwrap();
        assert_eq!(repo.get(&task.id).unwrap(), task);

        let updated = repo.update(&task.id, TaskDraft::new("Write the spec")).unwrap();
        assert_eq!(updated.id, task.id);
        assert_eq!(updated.title, "Write the spec");

        assert!(repo.delete(&task.id).unwrap());
        assert!(matches!(repo.get(&task.id), Err(TaskflowError::NotFound(_))));
        assert!(repo.fetch(&TaskFilter::all()).unwrap().is_empty());
    }
}
