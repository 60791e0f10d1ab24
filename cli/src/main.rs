mod logging;
mod table;
mod tui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, ValueEnum};
use taskflow_core::config::{config_path, default_data_dir};
use taskflow_core::{
    apply_args, parse_draft, sort_tasks, ActiveFilter, Board, Config, FileTaskRepository,
    InMemoryTaskRepository, MoveDirection, Priority, SortColumn, SortConfig, SortDirection, Status,
    Task, TaskDraft, TaskFilter, TaskRepository, TaskService, TaskStore,
};

use crate::tui::app::App;

#[derive(Parser)]
#[command(name = "taskflow")]
#[command(about = "A kanban task manager for the terminal", long_about = None)]
struct Cli {
    /// Directory holding tasks.json and config.toml (default: ~/.taskflow)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Log filter, e.g. `debug` or `taskflow_core=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Work on a throwaway in-memory board with sample tasks
    #[arg(long, global = true)]
    demo: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add a task (usage: add Write spec pri:high due:fri tags:work,docs)
    Add {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// List tasks as a table
    List {
        #[arg(long)]
        status: Option<Status>,
        #[arg(long)]
        priority: Option<Priority>,
        /// Case-insensitive match on title, description and tags
        #[arg(long)]
        search: Option<String>,
        /// Only tasks due today
        #[arg(long)]
        today: bool,
        /// title, status, priority or due
        #[arg(long)]
        sort: Option<SortColumn>,
        #[arg(long, requires = "sort")]
        desc: bool,
    },
    /// Show the kanban board
    Board,
    /// Show every field of a task
    Show { id: String },
    /// Change a task (usage: edit <id> New title pri:low due:none)
    Edit {
        id: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// Move a task one column along the board
    Move {
        id: String,
        #[arg(value_enum)]
        direction: Direction,
    },
    /// Delete a task
    Delete { id: String },
    /// Open the Terminal User Interface
    Tui,
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
    Forward,
    #[value(alias = "backward")]
    Back,
}

impl From<Direction> for MoveDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Forward => MoveDirection::Forward,
            Direction::Back => MoveDirection::Backward,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let home = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => default_data_dir()?,
    };
    let config_file = config_path(&home);
    let config = Config::load(&config_file)?;
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.resolve_data_dir(&home));

    let command = cli.command.unwrap_or(Commands::Tui);
    let level = cli
        .log_level
        .or_else(|| config.log_level.clone())
        .unwrap_or_else(|| "warn".to_string());
    let log_file = matches!(command, Commands::Tui).then(|| data_dir.join(logging::LOG_FILE_NAME));
    logging::init_tracing(&level, log_file.as_deref())?;

    if cli.demo {
        let service = TaskService::new(InMemoryTaskRepository::sample());
        run(command, service, config, None)
    } else {
        let repo = FileTaskRepository::new(Some(data_dir)).context("open task storage")?;
        run(command, TaskService::new(repo), config, Some(config_file))
    }
}

fn run<R: TaskRepository>(
    command: Commands,
    service: TaskService<R>,
    config: Config,
    config_file: Option<PathBuf>,
) -> Result<()> {
    match command {
        Commands::Add { args } => {
            let draft = parse_draft(&args)?;
            let task = service.create(&mut TaskStore::new(), draft)?;
            println!("Task added: {} (ID: {})", task.title, task.short_id());
            if let Some(due) = task.due_date {
                println!("  Due: {}", due);
            }
            println!("  Status: {}", task.status.label());
            println!("  Priority: {}", task.priority.label());
        }
        Commands::List {
            status,
            priority,
            search,
            today,
            sort,
            desc,
        } => {
            let filter = TaskFilter {
                status,
                priority,
                search_term: search,
            };
            let mut store = TaskStore::new();
            service.load_with(&mut store, &filter)?;

            let date = Local::now().date_naive();
            let mut tasks: Vec<&Task> = store
                .tasks()
                .iter()
                .filter(|t| !today || ActiveFilter::Today.matches_on(t, date))
                .collect();
            if let Some(column) = sort {
                let direction = if desc {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                };
                sort_tasks(&mut tasks, SortConfig::new(column, direction));
            }

            if tasks.is_empty() {
                println!("No tasks found.");
            } else {
                println!("{}", table::render_list(&tasks));
            }
        }
        Commands::Board => {
            let mut store = TaskStore::new();
            service.load(&mut store)?;
            println!("{}", table::render_board(&Board::from_tasks(store.tasks())));
        }
        Commands::Show { id } => {
            let id = service.resolve_id(&id)?;
            let task = service.repository().get(&id)?;
            print_task(&task);
        }
        Commands::Edit { id, args } => {
            let id = service.resolve_id(&id)?;
            let mut store = loaded_store(&service)?;
            let current = service.repository().get(&id)?;
            let draft = apply_args(TaskDraft::from(&current), &args)?;
            let task = service.edit(&mut store, &id, draft)?;
            println!("Task updated: {} (ID: {})", task.title, task.short_id());
        }
        Commands::Move { id, direction } => {
            let id = service.resolve_id(&id)?;
            let mut store = loaded_store(&service)?;
            match service.move_task(&mut store, &id, direction.into())? {
                Some(task) => println!("Task moved to {}: {}", task.status.label(), task.title),
                None => {
                    let task = service.repository().get(&id)?;
                    println!("Task is already in {}: {}", task.status.label(), task.title);
                }
            }
        }
        Commands::Delete { id } => {
            let id = service.resolve_id(&id)?;
            let mut store = loaded_store(&service)?;
            let title = store.get(&id).map(|t| t.title.clone()).unwrap_or_default();
            service.delete(&mut store, &id)?;
            println!("Task deleted: {}", title);
        }
        Commands::Tui => {
            tui::run(App::new(service, config, config_file))?;
        }
    }
    Ok(())
}

/// A store holding every task, so single-task commands update it in place.
fn loaded_store<R: TaskRepository>(service: &TaskService<R>) -> Result<TaskStore> {
    let mut store = TaskStore::new();
    service.load(&mut store)?;
    Ok(store)
}

fn print_task(task: &Task) {
    println!("{}", task.title);
    println!("  ID:       {}", task.id);
    println!("  Status:   {}", task.status.label());
    println!("  Priority: {}", task.priority.label());
    println!("  Due:      {}", table::due_label(task));
    if !task.tags.is_empty() {
        println!("  Tags:     {}", task.tags);
    }
    println!("  Created:  {}", task.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"));
    if let Some(description) = &task.description {
        println!();
        println!("{}", description);
    }
}
