use std::cell::Cell;

use uuid::Uuid;

use crate::error::{Result, TaskflowError, ValidationError};
use crate::model::filter::{ActiveFilter, TaskFilter};
use crate::model::task::{MoveDirection, Priority, Status, Task, TaskDraft};
use crate::repository::{InMemoryTaskRepository, TaskRepository};
use crate::service::task_service::TaskService;
use crate::store::{Action, TaskStore};
use crate::view::Board;

/// Counts calls and can be told to fail fetches.
#[derive(Default)]
struct MockTaskRepo {
    inner: InMemoryTaskRepository,
    calls: Cell<usize>,
    fail_fetch: Cell<bool>,
}

impl MockTaskRepo {
    fn hit(&self) {
        self.calls.set(self.calls.get() + 1);
    }
}

impl TaskRepository for MockTaskRepo {
    fn fetch(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        self.hit();
        if self.fail_fetch.get() {
            return Err(TaskflowError::Rejected("backend unavailable".to_string()));
        }
        self.inner.fetch(filter)
    }
    fn get(&self, id: &Uuid) -> Result<Task> {
        self.hit();
        self.inner.get(id)
    }
    fn create(&self, draft: TaskDraft) -> Result<Task> {
        self.hit();
        self.inner.create(draft)
    }
    fn update(&self, id: &Uuid, draft: TaskDraft) -> Result<Task> {
        self.hit();
        self.inner.update(id, draft)
    }
    fn delete(&self, id: &Uuid) -> Result<bool> {
        self.hit();
        self.inner.delete(id)
    }
}

fn service() -> TaskService<MockTaskRepo> {
    TaskService::new(MockTaskRepo::default())
}

fn column_titles(store: &TaskStore, status: Status) -> Vec<String> {
    Board::from_tasks(store.tasks())
        .column(status)
        .tasks
        .iter()
        .map(|t| t.title.clone())
        .collect()
}

#[test]
fn test_create_then_move_across_the_board() {
    let service = service();
    let mut store = TaskStore::new();
    service.load(&mut store).unwrap();
    let before = Board::from_tasks(store.tasks()).column(Status::Todo).count();

    let draft = TaskDraft::new("Write spec")
        .with_status(Status::Todo)
        .with_priority(Priority::High);
    let task = service.create(&mut store, draft).unwrap();

    assert_eq!(Board::from_tasks(store.tasks()).column(Status::Todo).count(), before + 1);
    assert_eq!(column_titles(&store, Status::Todo), vec!["Write spec"]);

    let moved = service
        .move_task(&mut store, &task.id, MoveDirection::Forward)
        .unwrap()
        .unwrap();
    assert_eq!(moved.status, Status::InProgress);
    assert!(column_titles(&store, Status::Todo).is_empty());
    assert_eq!(column_titles(&store, Status::InProgress), vec!["Write spec"]);
}

#[test]
fn test_move_past_the_edge_makes_no_call() {
    let service = service();
    let mut store = TaskStore::new();
    let task = service.create(&mut store, TaskDraft::new("stay")).unwrap();
    let calls = service.repository().calls.get();

    let result = service.move_task(&mut store, &task.id, MoveDirection::Backward).unwrap();
    assert!(result.is_none());
    assert_eq!(service.repository().calls.get(), calls);
    assert_eq!(store.get(&task.id).unwrap().status, Status::Todo);
}

#[test]
fn test_delete_removes_from_store_and_next_fetch() {
    let service = service();
    let mut store = TaskStore::new();
    let keep = service.create(&mut store, TaskDraft::new("keep")).unwrap();
    let gone = service.create(&mut store, TaskDraft::new("gone")).unwrap();
    service.load(&mut store).unwrap();
    assert_eq!(store.len(), 2);

    service.delete(&mut store, &gone.id).unwrap();
    assert_eq!(store.len(), 1);

    service.load(&mut store).unwrap();
    let ids: Vec<Uuid> = store.tasks().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![keep.id]);
}

#[test]
fn test_empty_title_never_reaches_the_repository() {
    let service = service();
    let mut store = TaskStore::new();

    let err = service.create(&mut store, TaskDraft::new("  ")).unwrap_err();
    assert!(matches!(err, TaskflowError::Validation(ValidationError::EmptyTitle)));
    assert_eq!(err.to_string(), "Please enter a task title");
    assert_eq!(service.repository().calls.get(), 0);
    assert!(store.is_empty());

    let err = service.edit(&mut store, &Uuid::new_v4(), TaskDraft::new("")).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(service.repository().calls.get(), 0);
}

#[test]
fn test_failed_load_sets_error_and_keeps_tasks() {
    let service = service();
    let mut store = TaskStore::new();
    service.create(&mut store, TaskDraft::new("cached")).unwrap();

    service.repository().fail_fetch.set(true);
    assert!(service.load(&mut store).is_err());
    assert_eq!(store.error(), Some("Storage rejected the request: backend unavailable"));
    assert!(!store.is_loading());
    assert_eq!(store.len(), 1);

    service.repository().fail_fetch.set(false);
    service.load(&mut store).unwrap();
    assert_eq!(store.error(), None);
}

#[test]
fn test_load_uses_store_filter_and_search() {
    let service = service();
    let mut store = TaskStore::new();
    service
        .create(&mut store, TaskDraft::new("Quarterly report").with_priority(Priority::High))
        .unwrap();
    service.create(&mut store, TaskDraft::new("Quarterly review")).unwrap();
    service
        .create(&mut store, TaskDraft::new("Fix bike").with_priority(Priority::High))
        .unwrap();

    store.dispatch(Action::SetActiveFilter(ActiveFilter::HighPriority));
    store.dispatch(Action::SetSearchTerm("quarterly".to_string()));
    service.load(&mut store).unwrap();

    let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Quarterly report"]);
}

#[test]
fn test_edit_of_task_outside_the_store_still_succeeds() {
    let service = service();
    let mut scratch = TaskStore::new();
    let task = service.create(&mut scratch, TaskDraft::new("elsewhere")).unwrap();

    let mut store = TaskStore::new();
    let edited = service
        .edit(&mut store, &task.id, TaskDraft::new("renamed"))
        .unwrap();
    assert_eq!(edited.title, "renamed");
    assert!(store.is_empty());
}

#[test]
fn test_resolve_id_by_prefix() {
    let service = service();
    let mut store = TaskStore::new();
    let task = service.create(&mut store, TaskDraft::new("find me")).unwrap();

    assert_eq!(service.resolve_id(&task.short_id()).unwrap(), task.id);
    assert_eq!(service.resolve_id(&task.id.to_string()).unwrap(), task.id);
    assert!(matches!(service.resolve_id("zz"), Err(TaskflowError::UnknownPrefix(_))));
    assert!(matches!(service.resolve_id(""), Err(TaskflowError::UnknownPrefix(_))));
}
