use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::task::Task;

/// Workflow column. A task's column is its status; tasks carry no separate status field.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Column {
    Todo,
    InProgress,
    Done,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::Todo, Column::InProgress, Column::Done];

    pub fn title(&self) -> &'static str {
        match self {
            Column::Todo => "To Do",
            Column::InProgress => "In Progress",
            Column::Done => "Done",
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown column '{0}', expected one of: todo, in-progress, done")]
pub struct ParseColumnError(String);

impl FromStr for Column {
    type Err = ParseColumnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Column::Todo),
            "inprogress" | "doing" => Ok(Column::InProgress),
            "done" => Ok(Column::Done),
            _ => Err(ParseColumnError(s.to_string())),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Column::Todo => "todo",
            Column::InProgress => "in-progress",
            Column::Done => "done",
        };
        f.write_str(name)
    }
}

/// The three-column task container owned by one project.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    #[serde(default)]
    todo: Vec<Task>,
    #[serde(default)]
    in_progress: Vec<Task>,
    #[serde(default)]
    done: Vec<Task>,
}

#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub progress_percentage: u8,
}

impl BoardSummary {
    /// A board is complete once it has tasks and all of them are done.
    pub fn is_complete(&self) -> bool {
        self.total_tasks > 0 && self.completed_tasks == self.total_tasks
    }
}

/// `completed / total * 100` rounded half up, 0 for an empty board.
pub fn progress_percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    ((completed * 200 + total) / (total * 2)) as u8
}

impl Board {
    pub fn column(&self, column: Column) -> &[Task] {
        match column {
            Column::Todo => &self.todo,
            Column::InProgress => &self.in_progress,
            Column::Done => &self.done,
        }
    }

    fn column_mut(&mut self, column: Column) -> &mut Vec<Task> {
        match column {
            Column::Todo => &mut self.todo,
            Column::InProgress => &mut self.in_progress,
            Column::Done => &mut self.done,
        }
    }

    /// All tasks with the column that holds them, in column order.
    pub fn tasks(&self) -> impl Iterator<Item = (Column, &Task)> {
        Column::ALL
            .into_iter()
            .flat_map(move |column| self.column(column).iter().map(move |task| (column, task)))
    }

    pub fn find(&self, task_id: Uuid) -> Option<(Column, &Task)> {
        self.tasks().find(|(_, task)| task.id == task_id)
    }

    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn aggregate(&self) -> BoardSummary {
        let total_tasks = self.len();
        let completed_tasks = self.done.len();
        BoardSummary {
            total_tasks,
            completed_tasks,
            progress_percentage: progress_percentage(completed_tasks, total_tasks),
        }
    }

    /// New tasks always enter at the tail of `todo`.
    pub(crate) fn push(&mut self, task: Task) {
        self.todo.push(task);
    }

    /// Moves a task to the tail of `to`.
    ///
    /// Returns false and leaves the board untouched when `from == to` or when the
    /// task is not in `from`.
    pub(crate) fn move_task(&mut self, task_id: Uuid, from: Column, to: Column) -> bool {
        if from == to {
            return false;
        }
        let source = self.column_mut(from);
        let Some(position) = source.iter().position(|t| t.id == task_id) else {
            return false;
        };
        let task = source.remove(position);
        self.column_mut(to).push(task);
        true
    }

    pub(crate) fn remove_task(&mut self, task_id: Uuid) -> Option<(Column, Task)> {
        for column in Column::ALL {
            let tasks = self.column_mut(column);
            if let Some(position) = tasks.iter().position(|t| t.id == task_id) {
                return Some((column, tasks.remove(position)));
            }
        }
        None
    }

    /// Drops repeated task ids, keeping the first occurrence in column order.
    /// Returns how many tasks were dropped.
    pub(crate) fn dedupe(&mut self) -> usize {
        let mut seen = HashSet::new();
        let mut dropped = 0;
        for column in Column::ALL {
            let tasks = self.column_mut(column);
            let before = tasks.len();
            tasks.retain(|t| seen.insert(t.id));
            dropped += before - tasks.len();
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{member::Member, task::Priority};
    use jiff::Timestamp;

    fn task(title: &str) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: String::new(),
            tags: vec![],
            assignee: Member::current_user(),
            priority: Priority::Medium,
            deadline: None,
            created_at: Timestamp::now(),
        }
    }

    fn board_with(todo: usize, in_progress: usize, done: usize) -> Board {
        let make = |n: usize| (0..n).map(|i| task(&format!("task {i}"))).collect();
        Board {
            todo: make(todo),
            in_progress: make(in_progress),
            done: make(done),
        }
    }

    #[test]
    fn test_empty_board_has_zero_progress() {
        let summary = Board::default().aggregate();

        assert_eq!(summary.total_tasks, 0);
        assert_eq!(summary.completed_tasks, 0);
        assert_eq!(summary.progress_percentage, 0);
        assert!(!summary.is_complete());
    }

    #[test]
    fn test_aggregate_counts_every_column() {
        for (todo, in_progress, done) in [(1, 0, 0), (2, 3, 1), (0, 0, 4), (0, 5, 0)] {
            let summary = board_with(todo, in_progress, done).aggregate();

            assert_eq!(summary.total_tasks, todo + in_progress + done);
            assert_eq!(summary.completed_tasks, done);
            assert!(summary.completed_tasks <= summary.total_tasks);
            assert!(summary.progress_percentage <= 100);
        }
    }

    #[test]
    fn test_progress_rounds_half_up() {
        assert_eq!(progress_percentage(1, 3), 33);
        assert_eq!(progress_percentage(2, 3), 67);
        assert_eq!(progress_percentage(1, 8), 13);
        assert_eq!(progress_percentage(1, 200), 1);
        assert_eq!(progress_percentage(1, 201), 0);
        assert_eq!(progress_percentage(3, 3), 100);
        assert_eq!(progress_percentage(0, 0), 0);
    }

    #[test]
    fn test_complete_only_when_everything_done() {
        assert!(board_with(0, 0, 2).aggregate().is_complete());
        assert!(!board_with(1, 0, 2).aggregate().is_complete());
        assert!(!board_with(0, 1, 2).aggregate().is_complete());
    }

    #[test]
    fn test_move_appends_to_destination_tail() {
        let mut board = board_with(2, 1, 0);
        let moving = board.todo[0].id;
        let already_there = board.in_progress[0].id;

        assert!(board.move_task(moving, Column::Todo, Column::InProgress));

        assert_eq!(board.todo.len(), 1);
        assert!(board.todo.iter().all(|t| t.id != moving));
        assert_eq!(board.in_progress[0].id, already_there);
        assert_eq!(board.in_progress[1].id, moving);
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn test_move_keeps_task_in_exactly_one_column() {
        let mut board = board_with(1, 0, 0);
        let id = board.todo[0].id;

        board.move_task(id, Column::Todo, Column::Done);
        board.move_task(id, Column::Done, Column::InProgress);

        let holders: Vec<_> = board.tasks().filter(|(_, t)| t.id == id).collect();
        assert_eq!(holders.len(), 1);
        assert_eq!(holders[0].0, Column::InProgress);
    }

    #[test]
    fn test_self_move_and_wrong_source_are_ignored() {
        let mut board = board_with(1, 1, 0);
        let before = board.clone();
        let id = board.todo[0].id;

        assert!(!board.move_task(id, Column::Todo, Column::Todo));
        assert!(!board.move_task(id, Column::InProgress, Column::Done));
        assert!(!board.move_task(Uuid::new_v4(), Column::Todo, Column::Done));
        assert_eq!(board, before);
    }

    #[test]
    fn test_remove_task_from_any_column() {
        let mut board = board_with(1, 1, 1);
        let id = board.in_progress[0].id;

        let (column, removed) = board.remove_task(id).unwrap();

        assert_eq!(column, Column::InProgress);
        assert_eq!(removed.id, id);
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn test_remove_missing_task_leaves_board_unchanged() {
        let mut board = board_with(2, 1, 1);
        let before = board.clone();

        assert!(board.remove_task(Uuid::new_v4()).is_none());
        assert_eq!(board, before);
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let mut board = board_with(1, 0, 0);
        let duplicate = board.todo[0].clone();
        board.done.push(duplicate.clone());
        board.todo.push(duplicate);

        assert_eq!(board.dedupe(), 2);
        assert_eq!(board.len(), 1);
        assert_eq!(board.find(board.todo[0].id).unwrap().0, Column::Todo);
    }

    #[test]
    fn test_column_parsing() {
        assert_eq!("todo".parse::<Column>().unwrap(), Column::Todo);
        assert_eq!("In-Progress".parse::<Column>().unwrap(), Column::InProgress);
        assert_eq!("in_progress".parse::<Column>().unwrap(), Column::InProgress);
        assert_eq!("DONE".parse::<Column>().unwrap(), Column::Done);
        assert!("blocked".parse::<Column>().is_err());
    }

    #[test]
    fn test_board_json_layout() {
        let value = serde_json::to_value(board_with(1, 0, 0)).unwrap();

        assert_eq!(value["todo"].as_array().unwrap().len(), 1);
        assert!(value["inProgress"].as_array().unwrap().is_empty());
        assert!(value["done"].as_array().unwrap().is_empty());

        let partial: Board = serde_json::from_str(r#"{"todo":[]}"#).unwrap();
        assert!(partial.is_empty());
    }
}
