use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Result, TaskflowError};
use crate::model::filter::TaskFilter;
use crate::model::task::{MoveDirection, Task, TaskDraft};
use crate::repository::TaskRepository;
use crate::store::{Action, Change, TaskStore};

/// What the views call. Each operation talks to the repository and then
/// brings the store in line with the outcome.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Fetches with the store's current filter selection and search term.
    pub fn load(&self, store: &mut TaskStore) -> Result<()> {
        let filter = store.active_filter().to_task_filter(store.search_term());
        self.load_with(store, &filter)
    }

    pub fn load_with(&self, store: &mut TaskStore, filter: &TaskFilter) -> Result<()> {
        let ticket = store.begin_fetch();
        match self.repo.fetch(filter) {
            Ok(tasks) => {
                debug!(count = tasks.len(), "tasks loaded");
                store.dispatch(Action::FetchSucceeded(ticket, tasks));
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to load tasks");
                store.dispatch(Action::FetchFailed(ticket, err.to_string()));
                Err(err)
            }
        }
    }

    /// Invalid drafts are rejected before the repository is touched.
    pub fn create(&self, store: &mut TaskStore, draft: TaskDraft) -> Result<Task> {
        draft.validate()?;
        let task = self.repo.create(draft)?;
        info!(id = %task.id, title = %task.title, "task created");
        store.dispatch(Action::AddTask(task.clone()));
        Ok(task)
    }

    pub fn edit(&self, store: &mut TaskStore, id: &Uuid, draft: TaskDraft) -> Result<Task> {
        draft.validate()?;
        let task = self.repo.update(id, draft)?;
        info!(id = %task.id, "task updated");
        self.sync_update(store, &task);
        Ok(task)
    }

    /// Moves a task one column along the board. Returns `None`, without
    /// touching the repository, when it is already in the last column that way.
    pub fn move_task(
        &self,
        store: &mut TaskStore,
        id: &Uuid,
        direction: MoveDirection,
    ) -> Result<Option<Task>> {
        let current = match store.get(id) {
            Some(task) => task.clone(),
            None => self.repo.get(id)?,
        };
        let Some(next) = current.status.step(direction) else {
            debug!(id = %id, status = %current.status, "task already at the edge of the board");
            return Ok(None);
        };

        let task = self.repo.update(id, TaskDraft::from(&current).with_status(next))?;
        info!(id = %task.id, from = %current.status, to = %task.status, "task moved");
        self.sync_update(store, &task);
        Ok(Some(task))
    }

    pub fn delete(&self, store: &mut TaskStore, id: &Uuid) -> Result<()> {
        self.repo.delete(id)?;
        info!(id = %id, "task deleted");
        if store.dispatch(Action::RemoveTask(*id)) == Change::Ignored {
            debug!(id = %id, "deleted task was not loaded in the store");
        }
        Ok(())
    }

    /// Accepts a full id or a unique prefix of one, as printed by `list`.
    pub fn resolve_id(&self, prefix: &str) -> Result<Uuid> {
        let prefix = prefix.trim().to_lowercase();
        if let Ok(id) = Uuid::parse_str(&prefix) {
            return Ok(id);
        }
        if prefix.is_empty() {
            return Err(TaskflowError::UnknownPrefix(prefix));
        }

        let matches: Vec<Uuid> = self
            .repo
            .fetch(&TaskFilter::all())?
            .into_iter()
            .map(|t| t.id)
            .filter(|id| id.to_string().starts_with(&prefix))
            .collect();

        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(TaskflowError::UnknownPrefix(prefix)),
            _ => Err(TaskflowError::AmbiguousPrefix {
                count: matches.len(),
                prefix,
            }),
        }
    }

    fn sync_update(&self, store: &mut TaskStore, task: &Task) {
        if store.dispatch(Action::UpdateTask(task.clone())) == Change::Ignored {
            warn!(id = %task.id, "updated task is not in the store; it will show after the next load");
        }
    }
}
