// Pure transformations over the task collection
//
// None of these touch storage; `Store` wraps them with persistence.

use crate::task::{Status, Task, TaskFields};

/// Distinct board names in order of first appearance
pub fn list_boards(tasks: &[Task]) -> Vec<String> {
    let mut boards: Vec<String> = Vec::new();
    for task in tasks {
        if !boards.iter().any(|b| *b == task.board) {
            boards.push(task.board.clone());
        }
    }
    boards
}

/// Tasks on `board`, in collection order
pub fn filter_by_board(tasks: &[Task], board: &str) -> Vec<Task> {
    tasks.iter().filter(|t| t.board == board).cloned().collect()
}

/// Append a task. The caller is responsible for id uniqueness.
pub fn insert(mut tasks: Vec<Task>, task: Task) -> Vec<Task> {
    tasks.push(task);
    tasks
}

/// Overwrite title, description and status of the task with `id`
///
/// Returns the collection and whether a task matched. A miss leaves the
/// collection unchanged.
pub fn update(mut tasks: Vec<Task>, id: &str, fields: TaskFields) -> (Vec<Task>, bool) {
    match tasks.iter_mut().find(|t| t.id == id) {
        Some(task) => {
            task.title = fields.title;
            task.description = fields.description;
            task.status = fields.status;
            (tasks, true)
        }
        None => (tasks, false),
    }
}

/// Drop the task with `id`, if any
pub fn remove(mut tasks: Vec<Task>, id: &str) -> Vec<Task> {
    tasks.retain(|t| t.id != id);
    tasks
}

/// Drop every task on `board`
pub fn remove_board(mut tasks: Vec<Task>, board: &str) -> Vec<Task> {
    tasks.retain(|t| t.board != board);
    tasks
}

/// Add a sentinel task so `board` shows up in `list_boards`
///
/// Blank names are ignored.
pub fn create_board(tasks: Vec<Task>, board: &str, id: String) -> Vec<Task> {
    let board = board.trim();
    if board.is_empty() {
        return tasks;
    }
    insert(tasks, Task::sentinel(id, board))
}

/// Real tasks split into the three status columns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Columns {
    pub todo: Vec<Task>,
    pub doing: Vec<Task>,
    pub done: Vec<Task>,
}

impl Columns {
    pub fn get(&self, status: &Status) -> &[Task] {
        match status {
            Status::Todo => &self.todo,
            Status::Doing => &self.doing,
            Status::Done => &self.done,
            Status::Other(_) => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.todo.len() + self.doing.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Group tasks by status, skipping sentinels and unknown statuses
pub fn group_by_status(tasks: &[Task]) -> Columns {
    let mut columns = Columns::default();
    for task in tasks.iter().filter(|t| !t.is_sentinel()) {
        match task.status {
            Status::Todo => columns.todo.push(task.clone()),
            Status::Doing => columns.doing.push(task.clone()),
            Status::Done => columns.done.push(task.clone()),
            Status::Other(_) => {}
        }
    }
    columns
}
