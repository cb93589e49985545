// Data models for the task board

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unit of work on a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub board: String,
}

impl Task {
    /// Build a task from user input, trimming every text field
    pub fn new(id: impl Into<String>, title: &str, description: &str, status: Status, board: &str) -> Self {
        Self {
            id: id.into(),
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            status,
            board: board.trim().to_string(),
        }
    }

    /// Placeholder task that makes an otherwise empty board visible
    pub fn sentinel(id: impl Into<String>, board: &str) -> Self {
        Self::new(id, "", "", Status::Todo, board)
    }

    /// True for the empty placeholder created alongside a new board
    pub fn is_sentinel(&self) -> bool {
        self.title.is_empty() && self.description.is_empty()
    }
}

/// Workflow stage of a task
///
/// Values outside the three known stages are kept verbatim in `Other` so
/// data written by another client survives a load/save cycle untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Todo,
    Doing,
    Done,
    Other(String),
}

impl Status {
    pub const COLUMNS: [Status; 3] = [Status::Todo, Status::Doing, Status::Done];

    pub fn as_str(&self) -> &str {
        match self {
            Status::Todo => "todo",
            Status::Doing => "doing",
            Status::Done => "done",
            Status::Other(s) => s,
        }
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        match s.as_str() {
            "todo" => Status::Todo,
            "doing" => Status::Doing,
            "done" => Status::Done,
            _ => Status::Other(s),
        }
    }
}

impl From<&str> for Status {
    fn from(s: &str) -> Self {
        Status::from(s.to_string())
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The editable fields of a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFields {
    pub title: String,
    pub description: String,
    pub status: Status,
}

impl TaskFields {
    pub fn new(title: &str, description: &str, status: impl Into<Status>) -> Self {
        Self {
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            status: status.into(),
        }
    }

    /// Current values of an existing task
    pub fn of(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status.clone(),
        }
    }
}

/// Color scheme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Stored representation
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light-theme",
            Theme::Dark => "dark-theme",
        }
    }

    /// Unknown values fall back to the light theme
    pub fn parse(s: &str) -> Self {
        match s {
            "dark-theme" => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Generate a task id that no task in `tasks` currently uses
///
/// UUIDv7 values are time-ordered with random low bits; the membership check
/// makes uniqueness within the collection explicit rather than probabilistic.
pub fn generate_task_id(tasks: &[Task]) -> String {
    loop {
        let id = format!("task-{}", Uuid::now_v7());
        if !tasks.iter().any(|t| t.id == id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&Status::Todo).unwrap(), "\"todo\"");
        assert_eq!(serde_json::to_string(&Status::Doing).unwrap(), "\"doing\"");
        assert_eq!(serde_json::to_string(&Status::Done).unwrap(), "\"done\"");

        let status: Status = serde_json::from_str("\"done\"").unwrap();
        assert_eq!(status, Status::Done);
    }

    #[test]
    fn test_status_out_of_enum_round_trip() {
        let status: Status = serde_json::from_str("\"blocked\"").unwrap();
        assert_eq!(status, Status::Other("blocked".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"blocked\"");

        let padded: Status = serde_json::from_str("\" doing \"").unwrap();
        assert_eq!(padded, Status::Other(" doing ".to_string()));
        assert_eq!(serde_json::to_string(&padded).unwrap(), "\" doing \"");
    }

    #[test]
    fn test_task_json_shape() {
        let task = Task::new("t1", "Write CV", "", Status::Todo, "Launch Career");
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "t1",
                "title": "Write CV",
                "description": "",
                "status": "todo",
                "board": "Launch Career",
            })
        );
    }

    #[test]
    fn test_task_new_trims() {
        let task = Task::new("t1", "  Title ", "\tdesc\n", Status::Doing, " Roadmap ");
        assert_eq!(task.title, "Title");
        assert_eq!(task.description, "desc");
        assert_eq!(task.board, "Roadmap");
    }

    #[test]
    fn test_sentinel() {
        let task = Task::sentinel("t1", "Roadmap");
        assert!(task.is_sentinel());
        assert_eq!(task.status, Status::Todo);
        assert_eq!(task.board, "Roadmap");
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!(Theme::parse("dark-theme"), Theme::Dark);
        assert_eq!(Theme::parse("light-theme"), Theme::Light);
        assert_eq!(Theme::parse("garbage"), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }

    #[test]
    fn test_generate_task_id_unique_under_rapid_calls() {
        let mut tasks = Vec::new();
        for _ in 0..1000 {
            let id = generate_task_id(&tasks);
            tasks.push(Task::sentinel(id, "b"));
        }
        let ids: HashSet<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), 1000);
        assert!(tasks.iter().all(|t| t.id.starts_with("task-")));
    }
}
