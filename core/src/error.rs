use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// Problems with user input, caught before any storage call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a task title")]
    EmptyTitle,

    #[error("Unknown status '{0}' (expected todo, in-progress or completed)")]
    UnknownStatus(String),

    #[error("Unknown priority '{0}' (expected low, medium or high)")]
    UnknownPriority(String),

    #[error("Could not parse date: {0}")]
    InvalidDate(String),

    #[error("Unknown key: '{0}'")]
    UnknownKey(String),

    #[error("Unknown view '{0}' (expected kanban or list)")]
    UnknownView(String),

    #[error("Unknown sort column '{0}' (expected title, status, priority or due)")]
    UnknownSortColumn(String),

    #[error("Ambiguous key: '{key}' matches {candidates:?}")]
    AmbiguousKey { key: String, candidates: Vec<String> },
}

#[derive(Error, Debug)]
pub enum TaskflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Task with ID {0} not found")]
    NotFound(Uuid),

    #[error("No task matches ID prefix '{0}'")]
    UnknownPrefix(String),

    #[error("ID prefix '{prefix}' is ambiguous ({count} tasks match)")]
    AmbiguousPrefix { prefix: String, count: usize },

    #[error("Storage rejected the request: {0}")]
    Rejected(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed task data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write config file: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Could not determine home directory")]
    NoHomeDir,
}

impl TaskflowError {
    /// Validation failures happen before any storage call is made.
    pub fn is_validation(&self) -> bool {
        matches!(self, TaskflowError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, TaskflowError>;
