pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod store;
pub mod time;
pub mod view;

pub use config::Config;
pub use error::{Result, TaskflowError, ValidationError};
pub use input::{apply_args, expand_key, parse_args, parse_draft, ParsedInput};
pub use model::filter::{visible_tasks, ActiveFilter, TaskFilter};
pub use model::tags::Tags;
pub use model::task::{MoveDirection, Priority, Status, Task, TaskDraft};
pub use repository::{FileTaskRepository, InMemoryTaskRepository, TaskRepository};
pub use service::TaskService;
pub use store::{reduce, Action, Change, FetchTicket, TaskStore, ViewMode};
pub use time::parse_human_date;
pub use view::{sort_tasks, Board, SortColumn, SortConfig, SortDirection};
