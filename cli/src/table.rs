use tabled::builder::Builder;
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use taskflow_core::{Board, Task};
use unicode_width::UnicodeWidthChar;

const TITLE_WIDTH: usize = 40;
const CARD_WIDTH: usize = 28;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        TaskRow {
            id: task.short_id(),
            status: task.status.label().to_string(),
            priority: task.priority.label().to_string(),
            due: due_label(task),
            title: truncate(&task.title, TITLE_WIDTH),
            tags: task.tags.to_string(),
        }
    }
}

pub fn due_label(task: &Task) -> String {
    task.due_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn render_list(tasks: &[&Task]) -> String {
    let rows: Vec<TaskRow> = tasks.iter().map(|t| TaskRow::from(*t)).collect();
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table.to_string()
}

/// Three columns side by side; row `i` holds the `i`-th card of each column.
pub fn render_board(board: &Board) -> String {
    let mut builder = Builder::default();
    builder.push_record(
        board
            .columns
            .iter()
            .map(|c| format!("{} ({})", c.title(), c.count())),
    );

    let depth = board.columns.iter().map(|c| c.count()).max().unwrap_or(0);
    for i in 0..depth {
        builder.push_record(board.columns.iter().map(|c| {
            c.tasks
                .get(i)
                .map(|t| card(t))
                .unwrap_or_default()
        }));
    }

    let mut table = builder.build();
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table.to_string()
}

fn card(task: &Task) -> String {
    let mut lines = vec![
        truncate(&task.title, CARD_WIDTH),
        format!("{} · {} · {}", task.short_id(), task.priority.label(), due_label(task)),
    ];
    if !task.tags.is_empty() {
        lines.push(truncate(&format!("#{}", task.tags.iter().collect::<Vec<_>>().join(" #")), CARD_WIDTH));
    }
    lines.join("\n")
}

/// Cuts `s` to at most `width` terminal columns, marking the cut with `…`.
pub fn truncate(s: &str, width: usize) -> String {
    let total: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use taskflow_core::{Status, TaskDraft, Tags};
    use uuid::Uuid;

    #[test]
    fn test_truncate_respects_display_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        assert_eq!(truncate("日本語のタスク", 5), "日本…");
    }

    #[test]
    fn test_board_lists_column_counts() {
        let tasks: Vec<Task> = [Status::Todo, Status::Todo, Status::Completed]
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                Task::from_draft(
                    Uuid::new_v4(),
                    Utc::now(),
                    TaskDraft::new(format!("task {}", i))
                        .with_status(s)
                        .with_tags(Tags::from_labels(["work"])),
                )
            })
            .collect();
        let out = render_board(&Board::from_tasks(&tasks));
        assert!(out.contains("To Do (2)"));
        assert!(out.contains("In Progress (0)"));
        assert!(out.contains("Completed (1)"));
        assert!(out.contains("#work"));
    }
}
