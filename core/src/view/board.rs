use crate::model::task::{Status, Task};

#[derive(Debug, Clone, PartialEq)]
pub struct Column<'a> {
    pub status: Status,
    pub tasks: Vec<&'a Task>,
}

impl Column<'_> {
    pub fn title(&self) -> &'static str {
        self.status.label()
    }

    pub fn count(&self) -> usize {
        self.tasks.len()
    }
}

/// Kanban grouping of a task list: To Do, In Progress, Completed.
#[derive(Debug, Clone, PartialEq)]
pub struct Board<'a> {
    pub columns: [Column<'a>; 3],
}

impl<'a> Board<'a> {
    /// Input order is kept inside each column.
    pub fn from_tasks<I>(tasks: I) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut columns = Status::ALL.map(|status| Column { status, tasks: Vec::new() });
        for task in tasks {
            columns[column_index(task.status)].tasks.push(task);
        }
        Self { columns }
    }

    pub fn column(&self, status: Status) -> &Column<'a> {
        &self.columns[column_index(status)]
    }

    pub fn total(&self) -> usize {
        self.columns.iter().map(Column::count).sum()
    }
}

pub fn column_index(status: Status) -> usize {
    match status {
        Status::Todo => 0,
        Status::InProgress => 1,
        Status::Completed => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskDraft;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_groups_by_status_preserving_order() {
        let tasks: Vec<Task> = [
            ("one", Status::Todo),
            ("two", Status::Completed),
            ("three", Status::Todo),
            ("four", Status::InProgress),
        ]
        .into_iter()
        .map(|(title, status)| {
            Task::from_draft(Uuid::new_v4(), Utc::now(), TaskDraft::new(title).with_status(status))
        })
        .collect();

        let board = Board::from_tasks(&tasks);
        let todo: Vec<&str> = board.column(Status::Todo).tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(todo, vec!["one", "three"]);
        assert_eq!(board.column(Status::InProgress).count(), 1);
        assert_eq!(board.column(Status::Completed).title(), "Completed");
        assert_eq!(board.total(), 4);
    }
}
