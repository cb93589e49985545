use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use eyre::{Result, eyre};
use std::path::PathBuf;
use taskboard::view;
use taskboard::{Backend, BoardView, Config, FileStorage, SqliteStorage, Storage, Store, TaskFields};
use tracing::Level;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Taskboard CLI - kanban boards persisted in a local key-value store")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to the store directory (default: from config, else the user data dir)
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    /// Storage backend (default: from config, else file)
    #[arg(short, long, value_enum)]
    backend: Option<Backend>,

    /// Config file (default: <config dir>/taskboard/taskboard.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the active board
    Show,

    /// List boards
    Boards,

    /// List tasks of a board
    Tasks {
        /// Board name (default: active board)
        #[arg(long)]
        board: Option<String>,
    },

    /// Add a task to the active board
    Add {
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,

        #[arg(short, long, default_value = "todo")]
        status: String,
    },

    /// Edit a task; omitted fields keep their current value
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        status: Option<String>,
    },

    /// Delete a task
    Delete { id: String },

    /// Create a board
    CreateBoard { name: String },

    /// Delete a board and all of its tasks
    DeleteBoard { name: String },

    /// Switch the active board
    Switch { board: String },

    /// Show or hide the board list
    Sidebar { visibility: Visibility },

    /// Toggle between light and dark theme
    Theme,
}

#[derive(Clone, Copy, ValueEnum)]
enum Visibility {
    Show,
    Hide,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(cli.config.as_deref())?;
    let store_path = cli.store_path.clone().unwrap_or_else(|| config.store_path());
    let backend = cli.backend.unwrap_or(config.backend);

    match backend {
        Backend::File => run(Store::open(FileStorage::open(&store_path)?)?, cli.command),
        Backend::Sqlite => run(Store::open(SqliteStorage::open(&store_path)?)?, cli.command),
    }
}

fn run<S: Storage>(mut store: Store<S>, command: Commands) -> Result<()> {
    match command {
        Commands::Show => {}
        Commands::Boards => {
            for board in store.list_boards() {
                if board == store.active_board() {
                    println!("* {}", board.bold());
                } else {
                    println!("  {}", board);
                }
            }
            return Ok(());
        }
        Commands::Tasks { board } => {
            let board = board.unwrap_or_else(|| store.active_board().to_string());
            for line in view::task_lines(&store.filter_by_board(&board)) {
                println!("{}", line);
            }
            return Ok(());
        }
        Commands::Add {
            title,
            description,
            status,
        } => {
            if store.active_board().is_empty() {
                return Err(eyre!("No active board; run `taskboard switch <board>` first"));
            }
            let task = store.add_task(&title, &description, status.trim())?;
            println!("Added {}", task.id);
        }
        Commands::Edit {
            id,
            title,
            description,
            status,
        } => {
            let Some(task) = store.select_task(&id) else {
                return Err(eyre!("No task with id {}", id));
            };
            let current = TaskFields::of(task);
            let fields = TaskFields::new(
                title.as_deref().unwrap_or(&current.title),
                description.as_deref().unwrap_or(&current.description),
                status.map(|s| s.trim().into()).unwrap_or(current.status),
            );
            store.save_selected(fields)?;
        }
        Commands::Delete { id } => {
            if !store.remove(&id)? {
                println!("No task with id {}", id);
            }
        }
        Commands::CreateBoard { name } => {
            store.create_board(&name)?;
        }
        Commands::DeleteBoard { name } => {
            let removed = store.remove_board(&name)?;
            println!("Deleted board {} ({} tasks)", name, removed);
        }
        Commands::Switch { board } => {
            store.set_active_board(board.trim())?;
        }
        Commands::Sidebar { visibility } => {
            store.set_show_side_bar(matches!(visibility, Visibility::Show))?;
        }
        Commands::Theme => {
            let theme = store.toggle_theme()?;
            println!("Theme: {}", theme.as_str());
        }
    }

    // Re-render after every write, like the board screen does
    print!("{}", BoardView::from_state(store.state()).render());
    Ok(())
}
