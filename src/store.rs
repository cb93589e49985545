// Task board store: board operations plus key-value persistence

use crate::board;
use crate::seed;
use crate::storage::Storage;
use crate::task::{Status, Task, TaskFields, Theme, generate_task_id};
use eyre::{Context, Result};
use tracing::{debug, info, warn};

pub const TASKS_KEY: &str = "tasks";
pub const ACTIVE_BOARD_KEY: &str = "activeBoard";
pub const SHOW_SIDE_BAR_KEY: &str = "showSideBar";
pub const THEME_KEY: &str = "theme";

/// Everything the board keeps between runs, plus the transient selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub tasks: Vec<Task>,
    /// Currently displayed board, empty if none
    pub active_board: String,
    /// Task under edit, empty if none. Never persisted.
    pub selected_task_id: String,
    pub show_side_bar: bool,
    pub theme: Theme,
}

/// Sole owner of the task collection and its storage
///
/// Each write runs the matching pure transformation from [`crate::board`]
/// and then overwrites the stored value before returning.
pub struct Store<S: Storage> {
    storage: S,
    state: AppState,
}

impl<S: Storage> Store<S> {
    /// Open a store over `storage`, seeding the task list on first run
    pub fn open(storage: S) -> Result<Self> {
        let mut store = Self {
            storage,
            state: AppState::default(),
        };

        store.load()?;
        store.state.active_board = store.read_active_board()?;
        store.state.show_side_bar = store.storage.get_item(SHOW_SIDE_BAR_KEY)?.as_deref() == Some("true");
        store.state.theme = store
            .storage
            .get_item(THEME_KEY)?
            .map(|t| Theme::parse(&t))
            .unwrap_or_default();

        debug!(
            tasks = store.state.tasks.len(),
            active_board = %store.state.active_board,
            show_side_bar = store.state.show_side_bar,
            theme = store.state.theme.as_str(),
            "Store opened"
        );
        Ok(store)
    }

    /// Read the persisted task list
    ///
    /// Absent or unparseable data is replaced by the initial dataset, which is
    /// persisted along with a hidden sidebar.
    pub fn load(&mut self) -> Result<&[Task]> {
        let stored = match self.storage.get_item(TASKS_KEY)? {
            Some(json) => match serde_json::from_str::<Vec<Task>>(&json) {
                Ok(tasks) => Some(tasks),
                Err(e) => {
                    warn!(error = ?e, "Stored tasks are malformed, reseeding");
                    None
                }
            },
            None => None,
        };

        match stored {
            Some(tasks) => {
                debug!(count = tasks.len(), "Loaded tasks");
                self.state.tasks = tasks;
            }
            None => {
                info!("No task data found, seeding initial dataset");
                self.state.tasks = seed::initial_tasks();
                self.persist_tasks()?;
                self.storage.set_item(SHOW_SIDE_BAR_KEY, "false")?;
                self.state.show_side_bar = false;
            }
        }

        Ok(&self.state.tasks)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn list_boards(&self) -> Vec<String> {
        board::list_boards(&self.state.tasks)
    }

    pub fn filter_by_board(&self, board: &str) -> Vec<Task> {
        board::filter_by_board(&self.state.tasks, board)
    }

    pub fn active_board(&self) -> &str {
        &self.state.active_board
    }

    /// Tasks of the active board
    pub fn active_tasks(&self) -> Vec<Task> {
        self.filter_by_board(&self.state.active_board)
    }

    /// Fresh id, unique within the current collection
    pub fn new_task_id(&self) -> String {
        generate_task_id(&self.state.tasks)
    }

    // ========================================================================
    // Task writes
    // ========================================================================

    /// Append a task. The caller supplies a unique id (see [`Store::new_task_id`]).
    pub fn insert(&mut self, task: Task) -> Result<&[Task]> {
        debug!(id = %task.id, board = %task.board, "insert: called");
        let tasks = std::mem::take(&mut self.state.tasks);
        self.state.tasks = board::insert(tasks, task);
        self.persist_tasks()?;
        Ok(&self.state.tasks)
    }

    /// Create a task on the active board with a fresh id
    pub fn add_task(&mut self, title: &str, description: &str, status: impl Into<Status>) -> Result<Task> {
        let task = Task::new(
            self.new_task_id(),
            title,
            description,
            status.into(),
            &self.state.active_board,
        );
        self.insert(task.clone())?;
        Ok(task)
    }

    /// Overwrite title, description and status of task `id`
    ///
    /// The collection is persisted even on a miss; the return value reports
    /// whether a task matched.
    pub fn update(&mut self, id: &str, fields: TaskFields) -> Result<bool> {
        let tasks = std::mem::take(&mut self.state.tasks);
        let (tasks, found) = board::update(tasks, id, fields);
        self.state.tasks = tasks;
        self.persist_tasks()?;

        if !found {
            debug!(id, "update: no task with this id");
        }
        Ok(found)
    }

    /// Delete task `id`; returns whether it existed
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let tasks = std::mem::take(&mut self.state.tasks);
        let before = tasks.len();
        self.state.tasks = board::remove(tasks, id);
        self.persist_tasks()?;
        Ok(self.state.tasks.len() < before)
    }

    /// Delete a board and every task on it; returns the number of tasks removed
    ///
    /// Clears the active board if it was the one removed.
    pub fn remove_board(&mut self, name: &str) -> Result<usize> {
        let tasks = std::mem::take(&mut self.state.tasks);
        let before = tasks.len();
        self.state.tasks = board::remove_board(tasks, name);
        self.persist_tasks()?;

        let removed = before - self.state.tasks.len();
        info!(board = name, removed, "Board deleted");

        if self.state.active_board == name {
            self.set_active_board("")?;
        }
        Ok(removed)
    }

    /// Make a new board visible by inserting a sentinel task
    ///
    /// Returns false, without writing, for a blank name.
    pub fn create_board(&mut self, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            debug!("create_board: blank name ignored");
            return Ok(false);
        }

        let id = self.new_task_id();
        let tasks = std::mem::take(&mut self.state.tasks);
        self.state.tasks = board::create_board(tasks, name, id);
        self.persist_tasks()?;
        info!(board = name, "Board created");
        Ok(true)
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn set_active_board(&mut self, name: &str) -> Result<()> {
        let json = serde_json::to_string(name)?;
        self.storage.set_item(ACTIVE_BOARD_KEY, &json)?;
        self.state.active_board = name.to_string();
        Ok(())
    }

    /// Mark task `id` as under edit and return it, if it exists
    pub fn select_task(&mut self, id: &str) -> Option<&Task> {
        let task = self.state.tasks.iter().find(|t| t.id == id)?;
        self.state.selected_task_id = task.id.clone();
        Some(task)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        if self.state.selected_task_id.is_empty() {
            return None;
        }
        self.state.tasks.iter().find(|t| t.id == self.state.selected_task_id)
    }

    /// Apply `fields` to the selected task and end the edit
    pub fn save_selected(&mut self, fields: TaskFields) -> Result<bool> {
        let id = std::mem::take(&mut self.state.selected_task_id);
        if id.is_empty() {
            return Ok(false);
        }
        self.update(&id, fields)
    }

    /// Delete the selected task and end the edit
    pub fn remove_selected(&mut self) -> Result<bool> {
        let id = std::mem::take(&mut self.state.selected_task_id);
        if id.is_empty() {
            return Ok(false);
        }
        self.remove(&id)
    }

    // ========================================================================
    // Preferences
    // ========================================================================

    pub fn set_show_side_bar(&mut self, show: bool) -> Result<()> {
        self.storage
            .set_item(SHOW_SIDE_BAR_KEY, if show { "true" } else { "false" })?;
        self.state.show_side_bar = show;
        Ok(())
    }

    /// Flip between light and dark; returns the new theme
    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let theme = self.state.theme.toggled();
        self.storage.set_item(THEME_KEY, theme.as_str())?;
        self.state.theme = theme;
        Ok(theme)
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn persist_tasks(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.state.tasks).context("Failed to serialize tasks")?;
        self.storage
            .set_item(TASKS_KEY, &json)
            .context("Failed to persist tasks")?;
        Ok(())
    }

    fn read_active_board(&self) -> Result<String> {
        let Some(json) = self.storage.get_item(ACTIVE_BOARD_KEY)? else {
            return Ok(String::new());
        };
        match serde_json::from_str::<String>(&json) {
            Ok(board) => Ok(board),
            Err(e) => {
                warn!(error = ?e, "Stored active board is malformed, ignoring");
                Ok(String::new())
            }
        }
    }
}
