use taskflow_core::{parse_human_date, Priority, Status, Tags, Task, TaskDraft, ValidationError};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Status,
    Priority,
    DueDate,
    Tags,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Title,
        FormField::Description,
        FormField::Status,
        FormField::Priority,
        FormField::DueDate,
        FormField::Tags,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title *",
            FormField::Description => "Description",
            FormField::Status => "Status",
            FormField::Priority => "Priority",
            FormField::DueDate => "Due Date",
            FormField::Tags => "Tags",
        }
    }

    fn offset(self, delta: isize) -> FormField {
        let len = Self::ALL.len() as isize;
        let pos = Self::ALL.iter().position(|f| *f == self).unwrap_or(0) as isize;
        Self::ALL[(pos + delta).rem_euclid(len) as usize]
    }
}

/// Create/edit modal state. `editing` is `None` for a new task.
#[derive(Debug, Clone)]
pub struct TaskForm {
    pub editing: Option<Uuid>,
    pub focus: FormField,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub due: String,
    pub tags: Tags,
    pub tag_input: String,
    pub error: Option<String>,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskForm {
    pub fn new() -> Self {
        Self {
            editing: None,
            focus: FormField::Title,
            title: String::new(),
            description: String::new(),
            status: Status::default(),
            priority: Priority::default(),
            due: String::new(),
            tags: Tags::new(),
            tag_input: String::new(),
            error: None,
        }
    }

    pub fn edit(task: &Task) -> Self {
        Self {
            editing: Some(task.id),
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status,
            priority: task.priority,
            due: task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            tags: task.tags.clone(),
            ..Self::new()
        }
    }

    pub fn heading(&self) -> &'static str {
        if self.editing.is_some() {
            " Edit Task "
        } else {
            " Create New Task "
        }
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.offset(1);
    }

    pub fn previous_field(&mut self) {
        self.focus = self.focus.offset(-1);
    }

    pub fn input_char(&mut self, c: char) {
        match self.focus {
            FormField::Title => self.title.push(c),
            FormField::Description => self.description.push(c),
            FormField::DueDate => self.due.push(c),
            FormField::Tags => self.tag_input.push(c),
            FormField::Status | FormField::Priority => {}
        }
    }

    /// On the tags field with nothing typed, drops the last tag.
    pub fn delete_char(&mut self) {
        match self.focus {
            FormField::Title => {
                self.title.pop();
            }
            FormField::Description => {
                self.description.pop();
            }
            FormField::DueDate => {
                self.due.pop();
            }
            FormField::Tags => {
                if self.tag_input.pop().is_none() {
                    if let Some(last) = self.tags.as_slice().last().cloned() {
                        self.tags.remove(&last);
                    }
                }
            }
            FormField::Status | FormField::Priority => {}
        }
    }

    /// Left/right on the choice fields.
    pub fn cycle_choice(&mut self, forward: bool) {
        match self.focus {
            FormField::Status => self.status = cycle(&Status::ALL, self.status, forward),
            FormField::Priority => self.priority = cycle(&Priority::ALL, self.priority, forward),
            _ => {}
        }
    }

    /// Moves typed tag text into the tag list. Returns `false` when there was
    /// nothing to commit, so the caller can treat Enter as submit.
    pub fn commit_tag_input(&mut self) -> bool {
        if self.tag_input.trim().is_empty() {
            return false;
        }
        self.tags.push(&self.tag_input);
        self.tag_input.clear();
        true
    }

    /// Runs the checks the repository would otherwise reject. Pending tag
    /// text is included.
    pub fn to_draft(&self) -> Result<TaskDraft, ValidationError> {
        let due_date = match self.due.trim() {
            "" => None,
            due => Some(parse_human_date(due)?),
        };
        let mut tags = self.tags.clone();
        tags.push(&self.tag_input);
        let draft = TaskDraft {
            title: self.title.clone(),
            description: Some(self.description.clone()),
            status: self.status,
            priority: self.priority,
            due_date,
            tags,
        }
        .normalized();
        draft.validate()?;
        Ok(draft)
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let len = all.len();
    let pos = all.iter().position(|v| *v == current).unwrap_or(0);
    let next = if forward { (pos + 1) % len } else { (pos + len - 1) % len };
    all[next]
}
