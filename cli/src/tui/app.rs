use std::path::PathBuf;

use chrono::Local;
use ratatui::widgets::TableState;
use taskflow_core::{
    sort_tasks, visible_tasks, Action, Board, Config, MoveDirection, SortColumn, SortConfig, Task,
    TaskRepository, TaskService, TaskStore, ViewMode,
};
use tracing::warn;
use uuid::Uuid;

use crate::tui::form::TaskForm;
use crate::tui::toast::Toasts;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Form,
    ConfirmDelete(Uuid),
}

pub struct App<R: TaskRepository> {
    pub service: TaskService<R>,
    pub store: TaskStore,
    pub sort: SortConfig,
    /// Focused board column and the selected row inside each column.
    pub column: usize,
    pub rows: [usize; 3],
    pub list_state: TableState,
    pub input_mode: InputMode,
    pub search_input: String,
    pub form: TaskForm,
    pub toasts: Toasts,
    pub config: Config,
    config_path: Option<PathBuf>,
    pub should_quit: bool,
}

impl<R: TaskRepository> App<R> {
    /// Without a `config_path` the theme toggle is not persisted.
    pub fn new(service: TaskService<R>, config: Config, config_path: Option<PathBuf>) -> Self {
        let mut app = App {
            service,
            store: TaskStore::with_view_mode(config.default_view),
            sort: SortConfig::default(),
            column: 0,
            rows: [0; 3],
            list_state: TableState::default(),
            input_mode: InputMode::Normal,
            search_input: String::new(),
            form: TaskForm::new(),
            toasts: Toasts::default(),
            config,
            config_path,
            should_quit: false,
        };
        app.reload();
        app
    }

    pub fn reload(&mut self) {
        if let Err(err) = self.service.load(&mut self.store) {
            self.toasts.error(format!("Failed to load tasks: {}", err));
        }
        self.clamp_selection();
    }

    /// Filtered and searched tasks, sorted for the list view.
    pub fn visible(&self) -> Vec<&Task> {
        let mut tasks = visible_tasks(
            self.store.tasks(),
            self.store.active_filter(),
            self.store.search_term(),
            Local::now().date_naive(),
        );
        sort_tasks(&mut tasks, self.sort);
        tasks
    }

    pub fn board(&self) -> Board<'_> {
        Board::from_tasks(visible_tasks(
            self.store.tasks(),
            self.store.active_filter(),
            self.store.search_term(),
            Local::now().date_naive(),
        ))
    }

    pub fn is_kanban(&self) -> bool {
        self.store.view_mode() == ViewMode::Kanban
    }

    pub fn selected_task(&self) -> Option<&Task> {
        if self.is_kanban() {
            let board = self.board();
            board.columns[self.column].tasks.get(self.rows[self.column]).copied()
        } else {
            let selected = self.list_state.selected()?;
            self.visible().get(selected).copied()
        }
    }

    fn selected_id(&self) -> Option<Uuid> {
        self.selected_task().map(|t| t.id)
    }

    pub fn next(&mut self) {
        self.step_row(1);
    }

    pub fn previous(&mut self) {
        self.step_row(-1);
    }

    fn step_row(&mut self, delta: isize) {
        if self.is_kanban() {
            let len = self.board().columns[self.column].count();
            if len > 0 {
                let row = self.rows[self.column] as isize + delta;
                self.rows[self.column] = row.rem_euclid(len as isize) as usize;
            }
        } else {
            let len = self.visible().len();
            if len > 0 {
                let row = self.list_state.selected().unwrap_or(0) as isize + delta;
                self.list_state.select(Some(row.rem_euclid(len as isize) as usize));
            }
        }
    }

    pub fn focus_left(&mut self) {
        self.column = self.column.saturating_sub(1);
    }

    pub fn focus_right(&mut self) {
        self.column = (self.column + 1).min(2);
    }

    /// Keeps every selection inside the current lists.
    fn clamp_selection(&mut self) {
        let counts = self.board().columns.map(|c| c.count());
        for (row, count) in self.rows.iter_mut().zip(counts) {
            *row = (*row).min(count.saturating_sub(1));
        }
        let len = self.visible().len();
        let selected = match (len, self.list_state.selected()) {
            (0, _) => None,
            (_, Some(i)) => Some(i.min(len - 1)),
            (_, None) => Some(0),
        };
        self.list_state.select(selected);
    }

    pub fn move_selected(&mut self, direction: MoveDirection) {
        let Some(id) = self.selected_id() else {
            return;
        };
        match self.service.move_task(&mut self.store, &id, direction) {
            Ok(Some(task)) => {
                self.toasts.success(format!("Task moved to {}", task.status.label()));
                if self.is_kanban() {
                    self.follow_task(&task);
                }
            }
            Ok(None) => {}
            Err(err) => self.toasts.error(format!("Failed to move task: {}", err)),
        }
        self.clamp_selection();
    }

    /// Puts the board focus on `task` after it changed column.
    fn follow_task(&mut self, task: &Task) {
        let board = self.board();
        let found = board.columns.iter().enumerate().find_map(|(c, column)| {
            column
                .tasks
                .iter()
                .position(|t| t.id == task.id)
                .map(|r| (c, r))
        });
        if let Some((column, row)) = found {
            self.column = column;
            self.rows[column] = row;
        }
    }

    pub fn request_delete(&mut self) {
        if let Some(id) = self.selected_id() {
            self.input_mode = InputMode::ConfirmDelete(id);
        }
    }

    pub fn confirm_delete(&mut self) {
        if let InputMode::ConfirmDelete(id) = self.input_mode {
            match self.service.delete(&mut self.store, &id) {
                Ok(()) => self.toasts.success("Task deleted successfully"),
                Err(err) => self.toasts.error(format!("Failed to delete task: {}", err)),
            }
        }
        self.input_mode = InputMode::Normal;
        self.clamp_selection();
    }

    pub fn open_new_form(&mut self) {
        self.form = TaskForm::new();
        if self.is_kanban() {
            let status = self.board().columns[self.column].status;
            self.form.status = status;
        }
        self.input_mode = InputMode::Form;
    }

    pub fn open_edit_form(&mut self) {
        if let Some(task) = self.selected_task() {
            self.form = TaskForm::edit(task);
            self.input_mode = InputMode::Form;
        }
    }

    pub fn cancel(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Validation problems stay in the form; nothing is sent until they are fixed.
    pub fn submit_form(&mut self) {
        let draft = match self.form.to_draft() {
            Ok(draft) => draft,
            Err(err) => {
                self.form.error = Some(err.to_string());
                return;
            }
        };

        let result = match self.form.editing {
            Some(id) => self
                .service
                .edit(&mut self.store, &id, draft)
                .map(|_| "Task updated successfully"),
            None => self
                .service
                .create(&mut self.store, draft)
                .map(|_| "Task added successfully"),
        };
        match result {
            Ok(message) => {
                self.toasts.success(message);
                self.input_mode = InputMode::Normal;
            }
            Err(err) if err.is_validation() => self.form.error = Some(err.to_string()),
            Err(err) => {
                warn!(error = %err, "task form submit failed");
                self.toasts.error(format!("Failed to save task: {}", err));
            }
        }
        self.clamp_selection();
    }

    pub fn cycle_filter(&mut self) {
        let next = self.store.active_filter().cycle();
        self.store.dispatch(Action::SetActiveFilter(next));
        self.reload();
    }

    pub fn toggle_view(&mut self) {
        let next = self.store.view_mode().toggle();
        self.store.dispatch(Action::SetViewMode(next));
        self.clamp_selection();
    }

    pub fn sort_by(&mut self, column: SortColumn) {
        self.sort = self.sort.toggle(column);
    }

    pub fn start_search(&mut self) {
        self.search_input = self.store.search_term().to_string();
        self.input_mode = InputMode::Search;
    }

    pub fn search_push(&mut self, c: char) {
        self.search_input.push(c);
        self.apply_search();
    }

    pub fn search_pop(&mut self) {
        self.search_input.pop();
        self.apply_search();
    }

    pub fn clear_search(&mut self) {
        self.search_input.clear();
        self.apply_search();
        self.input_mode = InputMode::Normal;
    }

    fn apply_search(&mut self) {
        self.store
            .dispatch(Action::SetSearchTerm(self.search_input.clone()));
        self.reload();
    }

    pub fn toggle_theme(&mut self) {
        self.config.dark_mode = !self.config.dark_mode;
        if let Some(path) = &self.config_path {
            if let Err(err) = self.config.save(path) {
                warn!(error = %err, path = %path.display(), "failed to save config");
                self.toasts.error(format!("Failed to save settings: {}", err));
            }
        }
        if self.config.dark_mode {
            self.toasts.info("Dark mode activated");
        } else {
            self.toasts.info("Light mode activated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskflow_core::{InMemoryTaskRepository, Status, TaskDraft};

    fn app() -> App<InMemoryTaskRepository> {
        App::new(TaskService::new(InMemoryTaskRepository::new()), Config::default(), None)
    }

    fn add(app: &mut App<InMemoryTaskRepository>, title: &str) -> Task {
        app.service
            .create(&mut app.store, TaskDraft::new(title))
            .unwrap()
    }

    fn toast_messages<R: TaskRepository>(app: &App<R>) -> Vec<String> {
        app.toasts.iter().map(|t| t.message.clone()).collect()
    }

    #[test]
    fn test_empty_form_shows_inline_error() {
        let mut app = app();
        app.open_new_form();
        app.submit_form();

        assert_eq!(app.input_mode, InputMode::Form);
        assert_eq!(app.form.error.as_deref(), Some("Please enter a task title"));
        assert!(app.store.is_empty());
    }

    #[test]
    fn test_form_creates_in_focused_column() {
        let mut app = app();
        app.focus_right();
        app.open_new_form();
        for c in "Write spec".chars() {
            app.form.input_char(c);
        }
        app.submit_form();

        assert_eq!(app.input_mode, InputMode::Normal);
        let task = &app.store.tasks()[0];
        assert_eq!(task.status, Status::InProgress);
        assert_eq!(toast_messages(&app), vec!["Task added successfully"]);
    }

    #[test]
    fn test_move_follows_task_to_next_column() {
        let mut app = app();
        let task = add(&mut app, "Ship it");
        app.reload();

        app.move_selected(MoveDirection::Forward);
        assert_eq!(app.column, 1);
        assert_eq!(app.selected_task().map(|t| t.id), Some(task.id));
        assert_eq!(toast_messages(&app), vec!["Task moved to In Progress"]);
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let mut app = app();
        add(&mut app, "Keep");
        add(&mut app, "Drop");
        app.reload();
        let target = app.selected_task().map(|t| t.id).unwrap();

        app.request_delete();
        assert_eq!(app.input_mode, InputMode::ConfirmDelete(target));
        assert_eq!(app.store.len(), 2);

        app.confirm_delete();
        assert_eq!(app.store.len(), 1);
        assert!(app.store.get(&target).is_none());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_list_selection_wraps_and_sort_toggles() {
        let mut app = app();
        add(&mut app, "b");
        add(&mut app, "a");
        app.reload();
        app.toggle_view();
        assert_eq!(app.store.view_mode(), ViewMode::List);

        app.sort_by(SortColumn::Title);
        assert_eq!(app.selected_task().map(|t| t.title.as_str()), Some("a"));
        app.previous();
        assert_eq!(app.selected_task().map(|t| t.title.as_str()), Some("b"));

        app.sort_by(SortColumn::Title);
        assert_eq!(app.visible()[0].title, "b");
    }

    #[test]
    fn test_search_narrows_visible_tasks() {
        let mut app = app();
        add(&mut app, "Buy milk");
        add(&mut app, "Write report");
        app.start_search();
        for c in "MILK".chars() {
            app.search_push(c);
        }
        let titles: Vec<&str> = app.visible().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Buy milk"]);

        app.clear_search();
        assert_eq!(app.visible().len(), 2);
    }

    #[test]
    fn test_theme_toggle_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut app = App::new(
            TaskService::new(InMemoryTaskRepository::new()),
            Config::default(),
            Some(path.clone()),
        );

        app.toggle_theme();
        assert!(Config::load(&path).unwrap().dark_mode);
        assert_eq!(toast_messages(&app), vec!["Dark mode activated"]);
    }
}
