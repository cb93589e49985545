// Terminal rendering of the board state

use crate::board::{self, Columns};
use crate::store::AppState;
use crate::task::{Status, Task, Theme};
use colored::{Color, Colorize};
use std::fmt;

/// Snapshot of what the board screen shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    /// Sidebar entries; empty when the sidebar is hidden
    pub boards: Vec<String>,
    pub active_board: String,
    pub columns: Columns,
    pub theme: Theme,
}

impl BoardView {
    pub fn from_state(state: &AppState) -> Self {
        let boards = if state.show_side_bar {
            board::list_boards(&state.tasks)
        } else {
            Vec::new()
        };
        let tasks = board::filter_by_board(&state.tasks, &state.active_board);

        Self {
            boards,
            active_board: state.active_board.clone(),
            columns: board::group_by_status(&tasks),
            theme: state.theme,
        }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    fn accent(&self) -> Color {
        match self.theme {
            Theme::Light => Color::Blue,
            Theme::Dark => Color::BrightMagenta,
        }
    }

    fn status_color(&self, status: &Status) -> Color {
        match (self.theme, status) {
            (Theme::Light, Status::Todo) => Color::Cyan,
            (Theme::Light, Status::Doing) => Color::Yellow,
            (Theme::Light, Status::Done) => Color::Green,
            (Theme::Dark, Status::Todo) => Color::BrightCyan,
            (Theme::Dark, Status::Doing) => Color::BrightYellow,
            (Theme::Dark, Status::Done) => Color::BrightGreen,
            (_, Status::Other(_)) => Color::White,
        }
    }
}

impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.boards.is_empty() {
            writeln!(f, "{}", "BOARDS".color(self.accent()).bold())?;
            for name in &self.boards {
                if *name == self.active_board {
                    writeln!(f, "  {} {}", ">".color(self.accent()), name.bold())?;
                } else {
                    writeln!(f, "    {}", name)?;
                }
            }
            writeln!(f)?;
        }

        if self.active_board.is_empty() {
            return writeln!(f, "{}", "No board selected".dimmed());
        }

        writeln!(f, "{}", self.active_board.color(self.accent()).bold().underline())?;
        for status in &Status::COLUMNS {
            let tasks = self.columns.get(status);
            let header = format!("{} ({})", status.as_str().to_uppercase(), tasks.len());
            writeln!(f, "\n{}", header.color(self.status_color(status)).bold())?;
            for task in tasks {
                write_task(f, task)?;
            }
        }
        Ok(())
    }
}

fn write_task(f: &mut fmt::Formatter<'_>, task: &Task) -> fmt::Result {
    writeln!(f, "  - {} {}", task.title, format!("[{}]", task.id).dimmed())?;
    if !task.description.is_empty() {
        writeln!(f, "      {}", task.description)?;
    }
    Ok(())
}

/// One line per task, tab separated; blank tasks are marked so their ids stay reachable
pub fn task_lines(tasks: &[Task]) -> Vec<String> {
    tasks
        .iter()
        .map(|task| {
            let title = if task.is_sentinel() { "(placeholder)" } else { task.title.as_str() };
            format!("{}\t{}\t{}", task.id, task.status, title)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn state(active: &str, show_side_bar: bool) -> AppState {
        AppState {
            tasks: seed::initial_tasks(),
            active_board: active.to_string(),
            show_side_bar,
            ..AppState::default()
        }
    }

    #[test]
    fn test_view_groups_active_board() {
        let view = BoardView::from_state(&state("Launch Career", false));
        assert!(view.boards.is_empty());
        assert_eq!(view.columns.todo.len(), 1);
        assert_eq!(view.columns.doing.len(), 2);
        assert!(view.columns.done.is_empty());
    }

    #[test]
    fn test_view_sidebar_lists_boards() {
        let view = BoardView::from_state(&state("Roadmap", true));
        assert_eq!(view.boards, vec!["Launch Career".to_string(), "Roadmap".to_string()]);
    }

    #[test]
    fn test_view_hides_sentinels() {
        let mut st = state("Fresh", true);
        st.tasks.push(Task::sentinel("s1", "Fresh"));

        let view = BoardView::from_state(&st);
        assert!(view.columns.is_empty());
        assert!(view.boards.contains(&"Fresh".to_string()));
    }

    #[test]
    fn test_render_contains_tasks() {
        let out = BoardView::from_state(&state("Roadmap", true)).render();
        assert!(out.contains("Roadmap"));
        assert!(out.contains("Build Portfolio Projects"));
        assert!(out.contains("DONE (2)"));
        assert!(!out.contains("Master JavaScript"));
    }

    #[test]
    fn test_task_lines_include_blank_tasks() {
        let tasks = vec![
            Task::new("t1", "Write CV", "", Status::Doing, "B"),
            Task::sentinel("s1", "B"),
        ];
        let lines = task_lines(&tasks);
        assert_eq!(lines, vec!["t1\tdoing\tWrite CV".to_string(), "s1\ttodo\t(placeholder)".to_string()]);
    }

    #[test]
    fn test_render_without_board() {
        let out = BoardView::from_state(&state("", false)).render();
        assert!(out.contains("No board selected"));
    }
}
