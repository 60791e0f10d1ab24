pub mod app;
pub mod form;
pub mod toast;
pub mod ui;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use taskflow_core::{MoveDirection, SortColumn, TaskRepository};
use tracing::{error, info};

use crate::tui::app::{App, InputMode};
use crate::tui::form::FormField;

const TICK: Duration = Duration::from_millis(250);

pub fn run<R: TaskRepository>(mut app: App<R>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!("tui started");
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = %err, "tui exited with an error");
    }
    res.map_err(Into::into)
}

fn run_app<B: Backend, R: TaskRepository>(
    terminal: &mut Terminal<B>,
    app: &mut App<R>,
) -> io::Result<()> {
    while !app.should_quit {
        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
            }
        }
        app.toasts.prune(Instant::now());
    }
    Ok(())
}

fn handle_key<R: TaskRepository>(app: &mut App<R>, key: KeyEvent) {
    match app.input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => app.next(),
            KeyCode::Up | KeyCode::Char('k') => app.previous(),
            KeyCode::Left | KeyCode::Char('h') => app.focus_left(),
            KeyCode::Right | KeyCode::Char('l') => app.focus_right(),
            KeyCode::Char(']') => app.move_selected(MoveDirection::Forward),
            KeyCode::Char('[') => app.move_selected(MoveDirection::Backward),
            KeyCode::Char('n') | KeyCode::Char('a') => app.open_new_form(),
            KeyCode::Char('e') | KeyCode::Enter => app.open_edit_form(),
            KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
            KeyCode::Char('f') => app.cycle_filter(),
            KeyCode::Char('v') => app.toggle_view(),
            KeyCode::Char('/') => app.start_search(),
            KeyCode::Char('t') => app.toggle_theme(),
            KeyCode::Char('r') => app.reload(),
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                app.sort_by(SortColumn::ALL[index]);
            }
            _ => {}
        },
        InputMode::Search => match key.code {
            KeyCode::Enter => app.cancel(),
            KeyCode::Esc => app.clear_search(),
            KeyCode::Backspace => app.search_pop(),
            KeyCode::Char(c) => app.search_push(c),
            _ => {}
        },
        InputMode::Form => match key.code {
            KeyCode::Esc => app.cancel(),
            KeyCode::Tab | KeyCode::Down => app.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => app.form.previous_field(),
            KeyCode::Left => app.form.cycle_choice(false),
            KeyCode::Right => app.form.cycle_choice(true),
            KeyCode::Backspace => app.form.delete_char(),
            KeyCode::Enter => {
                if !(app.form.focus == FormField::Tags && app.form.commit_tag_input()) {
                    app.submit_form();
                }
            }
            KeyCode::Char(c) => app.form.input_char(c),
            _ => {}
        },
        InputMode::ConfirmDelete(_) => match key.code {
            KeyCode::Char('y') | KeyCode::Enter => app.confirm_delete(),
            _ => app.cancel(),
        },
    }
}
