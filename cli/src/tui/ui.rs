use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
    Frame,
};
use taskflow_core::{Priority, SortColumn, Task, TaskRepository};

use crate::table::{due_label, truncate};
use crate::tui::app::{App, InputMode};
use crate::tui::form::{FormField, TaskForm};
use crate::tui::toast::ToastLevel;

const TOAST_WIDTH: u16 = 42;

struct Theme {
    text: Color,
    muted: Color,
    accent: Color,
    border: Color,
    selected_bg: Color,
    background: Color,
}

impl Theme {
    fn new(dark: bool) -> Self {
        if dark {
            Theme {
                text: Color::Gray,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                border: Color::DarkGray,
                selected_bg: Color::Rgb(50, 50, 70),
                background: Color::Black,
            }
        } else {
            Theme {
                text: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                border: Color::Gray,
                selected_bg: Color::Rgb(220, 225, 240),
                background: Color::White,
            }
        }
    }

    fn block<'a>(&self, title: impl Into<Line<'a>>, focused: bool) -> Block<'a> {
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(if focused { self.accent } else { self.border }))
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

pub fn draw<R: TaskRepository>(f: &mut Frame, app: &mut App<R>) {
    let theme = Theme::new(app.config.dark_mode);
    let size = f.area();
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background).fg(theme.text)),
        size,
    );

    let error_height = if app.store.error().is_some() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(error_height),
            Constraint::Length(1),
        ])
        .split(size);

    draw_header(f, app, &theme, chunks[0]);
    if app.is_kanban() {
        draw_board(f, app, &theme, chunks[1]);
    } else {
        draw_list(f, app, &theme, chunks[1]);
    }
    if let Some(error) = app.store.error() {
        let line = Paragraph::new(format!("{} (press r to retry)", error))
            .style(Style::default().fg(Color::Red));
        f.render_widget(line, chunks[2]);
    }
    draw_footer(f, app, &theme, chunks[3]);

    match app.input_mode {
        InputMode::Form => draw_form(f, &app.form, &theme, size),
        InputMode::ConfirmDelete(id) => {
            let title = app
                .store
                .get(&id)
                .map(|t| t.title.clone())
                .unwrap_or_default();
            draw_confirm(f, &title, &theme, size);
        }
        InputMode::Normal | InputMode::Search => {}
    }
    draw_toasts(f, app, size);
}

fn draw_header<R: TaskRepository>(f: &mut Frame, app: &App<R>, theme: &Theme, area: Rect) {
    let mut spans = vec![
        Span::styled(
            " TaskFlow ",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled("│ ", Style::default().fg(theme.muted)),
        Span::raw(app.store.active_filter().label()),
    ];
    if !app.store.search_term().is_empty() {
        spans.push(Span::styled(
            format!("  search: \"{}\"", app.store.search_term()),
            Style::default().fg(theme.muted),
        ));
    }
    let view = if app.is_kanban() {
        "Board".to_string()
    } else {
        format!("List · {}", app.sort)
    };
    spans.push(Span::styled(format!("  │ {}", view), Style::default().fg(theme.muted)));
    if app.store.is_loading() {
        spans.push(Span::styled("  loading…", Style::default().fg(theme.muted)));
    }

    let header = Paragraph::new(Line::from(spans)).block(theme.block("", false));
    f.render_widget(header, area);
}

fn card_item<'a>(task: &Task, theme: &Theme, width: usize) -> ListItem<'a> {
    let mut lines = vec![
        Line::from(Span::styled(
            truncate(&task.title, width),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("● ", Style::default().fg(priority_color(task.priority))),
            Span::styled(
                format!("{} · {}", task.priority.label(), due_label(task)),
                Style::default().fg(theme.muted),
            ),
        ]),
    ];
    if !task.tags.is_empty() {
        let tags: Vec<String> = task.tags.iter().map(|t| format!("#{}", t)).collect();
        lines.push(Line::from(Span::styled(
            truncate(&tags.join(" "), width),
            Style::default().fg(theme.accent),
        )));
    }
    lines.push(Line::from(""));
    ListItem::new(lines)
}

fn draw_board<R: TaskRepository>(f: &mut Frame, app: &App<R>, theme: &Theme, area: Rect) {
    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    let board = app.board();
    for (i, column) in board.columns.iter().enumerate() {
        let focused = i == app.column;
        let width = areas[i].width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = column
            .tasks
            .iter()
            .map(|t| card_item(t, theme, width))
            .collect();
        let title = format!(" {} ({}) ", column.title(), column.count());
        let list = List::new(items)
            .block(theme.block(title, focused))
            .highlight_style(Style::default().bg(theme.selected_bg));

        let mut state = ListState::default();
        if focused && column.count() > 0 {
            state.select(Some(app.rows[i]));
        }
        f.render_stateful_widget(list, areas[i], &mut state);
    }
}

fn draw_list<R: TaskRepository>(f: &mut Frame, app: &mut App<R>, theme: &Theme, area: Rect) {
    let header = Row::new(SortColumn::ALL.iter().enumerate().map(|(i, column)| {
        let arrow = if app.sort.column == *column {
            format!(" {}", app.sort.direction.arrow())
        } else {
            String::new()
        };
        format!("{} {}{}", i + 1, column.label(), arrow)
    }))
    .style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .visible()
        .into_iter()
        .map(|task| {
            Row::new(vec![
                Span::raw(task.title.clone()),
                Span::raw(task.status.label()),
                Span::styled(task.priority.label(), Style::default().fg(priority_color(task.priority))),
                Span::raw(due_label(task)),
            ])
        })
        .collect();
    let count = rows.len();

    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(theme.block(format!(" Tasks ({}) ", count), true))
    .row_highlight_style(Style::default().bg(theme.selected_bg).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.list_state);
}

fn draw_footer<R: TaskRepository>(f: &mut Frame, app: &App<R>, theme: &Theme, area: Rect) {
    let text = match app.input_mode {
        InputMode::Search => format!("/{}█   Enter: keep  Esc: clear", app.search_input),
        InputMode::Form => "Tab: next field  ←/→: change  Enter: save  Esc: cancel".to_string(),
        InputMode::ConfirmDelete(_) => "y: delete  any other key: cancel".to_string(),
        InputMode::Normal if app.is_kanban() => {
            "n: new  e: edit  d: delete  [/]: move  h/l: column  f: filter  /: search  v: list  t: theme  q: quit"
                .to_string()
        }
        InputMode::Normal => {
            "n: new  e: edit  d: delete  [/]: move  1-4: sort  f: filter  /: search  v: board  t: theme  q: quit"
                .to_string()
        }
    };
    let footer = Paragraph::new(text)
        .style(Style::default().fg(theme.muted))
        .alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn draw_form(f: &mut Frame, form: &TaskForm, theme: &Theme, area: Rect) {
    let popup = centered(area, 64, 16);
    f.render_widget(Clear, popup);

    let mut lines = Vec::new();
    for field in FormField::ALL {
        let focused = form.focus == field;
        let value = match field {
            FormField::Title => form.title.clone(),
            FormField::Description => form.description.clone(),
            FormField::Status => format!("< {} >", form.status.label()),
            FormField::Priority => format!("< {} >", form.priority.label()),
            FormField::DueDate => form.due.clone(),
            FormField::Tags => {
                let mut tags: Vec<String> = form.tags.iter().map(|t| format!("#{}", t)).collect();
                tags.push(form.tag_input.clone());
                tags.join(" ")
            }
        };
        let cursor = match field {
            FormField::Status | FormField::Priority => "",
            _ if focused => "█",
            _ => "",
        };
        let label_style = if focused {
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<12} ", field.label()), label_style),
            Span::raw(format!("{}{}", value, cursor)),
        ]));
        lines.push(Line::from(""));
    }
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))));
    } else if form.focus == FormField::DueDate {
        lines.push(Line::from(Span::styled(
            "YYYY-MM-DD, today, tomorrow, fri, +3d …",
            Style::default().fg(theme.muted),
        )));
    } else if form.focus == FormField::Tags {
        lines.push(Line::from(Span::styled(
            "Enter adds a tag, Backspace removes the last one",
            Style::default().fg(theme.muted),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(theme.block(form.heading(), true).style(Style::default().bg(theme.background)))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, popup);
}

fn draw_confirm(f: &mut Frame, title: &str, theme: &Theme, area: Rect) {
    let popup = centered(area, 50, 5);
    f.render_widget(Clear, popup);
    let text = vec![
        Line::from(format!("Delete \"{}\"?", truncate(title, 36))),
        Line::from(Span::styled("y: confirm   n: cancel", Style::default().fg(theme.muted))),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(theme.block(" Delete Task ", true).style(Style::default().bg(theme.background)));
    f.render_widget(paragraph, popup);
}

fn draw_toasts<R: TaskRepository>(f: &mut Frame, app: &App<R>, area: Rect) {
    let width = TOAST_WIDTH.min(area.width);
    let mut y = area.y + area.height.saturating_sub(2);
    for toast in app.toasts.iter() {
        if y < area.y + 3 {
            break;
        }
        y -= 3;
        let rect = Rect::new(area.x + area.width - width, y, width, 3);
        let color = match toast.level {
            ToastLevel::Info => Color::Blue,
            ToastLevel::Success => Color::Green,
            ToastLevel::Error => Color::Red,
        };
        f.render_widget(Clear, rect);
        let paragraph = Paragraph::new(truncate(&toast.message, width.saturating_sub(4) as usize))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(color)),
            );
        f.render_widget(paragraph, rect);
    }
}
