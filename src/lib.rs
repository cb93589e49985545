// Taskboard - kanban task board persisted in a key-value store

pub mod board;
pub mod config;
pub mod seed;
pub mod sqlite;
pub mod storage;
pub mod store;
pub mod task;
pub mod view;

// Re-export main types for convenience
pub use board::Columns;
pub use config::{Backend, Config};
pub use sqlite::SqliteStorage;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{AppState, Store};
pub use task::{Status, Task, TaskFields, Theme, generate_task_id};
pub use view::BoardView;
