// Initial dataset written on first run

use crate::task::{Status, Task};

const INITIAL_TASKS: &[(&str, &str, &str, Status, &str)] = &[
    (
        "task-1",
        "Launch Epic Career",
        "Create a killer Resume",
        Status::Todo,
        "Launch Career",
    ),
    (
        "task-2",
        "Master JavaScript",
        "Get comfortable with the fundamentals",
        Status::Doing,
        "Launch Career",
    ),
    (
        "task-3",
        "Keep on Going",
        "You're almost there",
        Status::Doing,
        "Launch Career",
    ),
    (
        "task-4",
        "Learn Data Structures and Algorithms",
        "Study fundamental data structures and algorithms to solve coding problems efficiently",
        Status::Todo,
        "Roadmap",
    ),
    (
        "task-5",
        "Contribute to Open Source Projects",
        "Gain practical experience and collaborate with others in the software development community",
        Status::Done,
        "Roadmap",
    ),
    (
        "task-6",
        "Build Portfolio Projects",
        "Create a portfolio showcasing your skills and projects to potential employers",
        Status::Done,
        "Roadmap",
    ),
];

/// The fixed collection a fresh store starts with
pub fn initial_tasks() -> Vec<Task> {
    INITIAL_TASKS
        .iter()
        .map(|(id, title, description, status, board)| Task::new(*id, title, description, status.clone(), board))
        .collect()
}
