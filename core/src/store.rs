//! Session state shared by the board, the list and the form.
//!
//! [`TaskStore`] is a plain owned value. Every change goes through an
//! [`Action`], applied by the pure [`reduce`] function or in place with
//! [`TaskStore::dispatch`]. The store never performs I/O; it is a cache of the
//! last successful fetch or mutation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::model::filter::ActiveFilter;
use crate::model::task::Task;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Kanban,
    List,
}

impl ViewMode {
    pub fn toggle(self) -> ViewMode {
        match self {
            ViewMode::Kanban => ViewMode::List,
            ViewMode::List => ViewMode::Kanban,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Kanban => f.write_str("kanban"),
            ViewMode::List => f.write_str("list"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kanban" | "board" => Ok(ViewMode::Kanban),
            "list" | "table" => Ok(ViewMode::List),
            _ => Err(ValidationError::UnknownView(s.to_string())),
        }
    }
}

/// Identifies one fetch. Results carrying an older ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetTasks(Vec<Task>),
    AddTask(Task),
    UpdateTask(Task),
    RemoveTask(Uuid),
    SetLoading(bool),
    SetError(Option<String>),
    SetActiveFilter(ActiveFilter),
    SetSearchTerm(String),
    SetViewMode(ViewMode),
    FetchStarted,
    FetchSucceeded(FetchTicket, Vec<Task>),
    FetchFailed(FetchTicket, String),
}

/// Whether an action changed the state. `UpdateTask`/`RemoveTask` on an
/// unknown id and stale fetch results are `Ignored`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Applied,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    loading: bool,
    error: Option<String>,
    active_filter: ActiveFilter,
    search_term: String,
    view_mode: ViewMode,
    generation: u64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_view_mode(view_mode: ViewMode) -> Self {
        Self {
            view_mode,
            ..Self::default()
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == *id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn active_filter(&self) -> ActiveFilter {
        self.active_filter
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Marks a fetch as in flight and returns the ticket its result must carry.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.dispatch(Action::FetchStarted);
        FetchTicket(self.generation)
    }

    pub fn dispatch(&mut self, action: Action) -> Change {
        match action {
            Action::SetTasks(tasks) => self.replace_tasks(tasks),
            Action::AddTask(task) => self.tasks.push(task),
            Action::UpdateTask(task) => {
                match self.tasks.iter_mut().find(|t| t.id == task.id) {
                    Some(slot) => *slot = task,
                    None => return Change::Ignored,
                }
            }
            Action::RemoveTask(id) => {
                let before = self.tasks.len();
                self.tasks.retain(|t| t.id != id);
                if self.tasks.len() == before {
                    return Change::Ignored;
                }
            }
            Action::SetLoading(loading) => self.loading = loading,
            Action::SetError(error) => {
                self.error = error;
                self.loading = false;
            }
            Action::SetActiveFilter(filter) => self.active_filter = filter,
            Action::SetSearchTerm(term) => self.search_term = term,
            Action::SetViewMode(mode) => self.view_mode = mode,
            Action::FetchStarted => {
                self.generation += 1;
                self.loading = true;
            }
            Action::FetchSucceeded(ticket, tasks) => {
                if ticket.0 != self.generation {
                    return Change::Ignored;
                }
                self.replace_tasks(tasks);
            }
            Action::FetchFailed(ticket, message) => {
                if ticket.0 != self.generation {
                    return Change::Ignored;
                }
                self.error = Some(message);
                self.loading = false;
            }
        }
        Change::Applied
    }

    fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.loading = false;
        self.error = None;
    }
}

/// `(state, action) -> state`.
pub fn reduce(mut state: TaskStore, action: Action) -> TaskStore {
    state.dispatch(action);
    state
}
