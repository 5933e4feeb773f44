use jiff::{Timestamp, civil::Date};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{
        board::{Board, BoardSummary, Column},
        completed::CompletedProject,
        member::Member,
        store::Store,
        task::{Priority, Task, parse_tags},
    },
    services::{
        ValidationError, archive, required,
        search::{ResolveError, resolve},
    },
    storage::{self, Storage, StorageError},
};

/// Outcome of a task mutation, with the board totals it left behind.
#[derive(Debug, Clone)]
pub struct TaskMutationResult {
    pub task: Task,
    /// Column holding the task after the mutation, or the one it was deleted from
    pub column: Column,
    pub summary: BoardSummary,
    /// Set when this mutation completed the project for the first time
    pub archived: Option<CompletedProject>,
}

#[derive(Debug, Error)]
pub enum CreateTaskError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Project '{0}' not found")]
    ProjectNotFound(Uuid),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Default)]
pub struct CreateTaskParameters {
    pub title: String,
    pub description: String,
    /// Comma separated tags
    pub tags: String,
    /// Defaults to medium
    pub priority: Option<Priority>,
    /// Member id within the project; unknown or missing ids fall back to the current user
    pub assignee_id: Option<String>,
    pub deadline: Option<Date>,
}

/// Adds a task at the tail of the project's `todo` column.
pub fn create_task(
    store: &mut Store,
    storage: &impl Storage,
    project_id: Uuid,
    parameters: CreateTaskParameters,
) -> Result<TaskMutationResult, CreateTaskError> {
    let title = required(&parameters.title, ValidationError::EmptyTitle)?;
    let project = store
        .project(project_id)
        .ok_or(CreateTaskError::ProjectNotFound(project_id))?;

    let assignee = match parameters.assignee_id.as_deref() {
        Some(member_id) => project.member(member_id).cloned().unwrap_or_else(|| {
            tracing::debug!(member_id, "unknown assignee, assigning to current user");
            Member::current_user()
        }),
        None => Member::current_user(),
    };

    let now = Timestamp::now();
    let task = Task {
        id: Uuid::new_v4(),
        title,
        description: parameters.description.trim().to_string(),
        tags: parse_tags(&parameters.tags),
        assignee,
        priority: parameters.priority.unwrap_or_default(),
        deadline: parameters.deadline,
        created_at: now,
    };

    let summary = store
        .edit_board(project_id, now, |board| {
            board.push(task.clone());
            Some(board.aggregate())
        })
        .ok_or(CreateTaskError::ProjectNotFound(project_id))?;
    tracing::debug!(project_id = %project_id, task_id = %task.id, "task created");

    let archived = commit(store, storage, project_id, now)?;

    Ok(TaskMutationResult {
        task,
        column: Column::Todo,
        summary,
        archived,
    })
}

#[derive(Debug, Error)]
pub enum MoveTaskError {
    #[error("Project '{0}' not found")]
    ProjectNotFound(Uuid),

    #[error("Task '{task_id}' is not in column '{column}'")]
    TaskNotFound { task_id: Uuid, column: Column },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Moves a task from `from` to the tail of `to`.
///
/// Moving a task onto its own column changes nothing: no timestamps, no
/// recomputation, no writes.
pub fn move_task(
    store: &mut Store,
    storage: &impl Storage,
    project_id: Uuid,
    task_id: Uuid,
    from: Column,
    to: Column,
) -> Result<TaskMutationResult, MoveTaskError> {
    let board = store
        .board(project_id)
        .ok_or(MoveTaskError::ProjectNotFound(project_id))?;
    let task = board
        .column(from)
        .iter()
        .find(|t| t.id == task_id)
        .cloned()
        .ok_or(MoveTaskError::TaskNotFound {
            task_id,
            column: from,
        })?;

    if from == to {
        return Ok(TaskMutationResult {
            task,
            column: from,
            summary: board.aggregate(),
            archived: None,
        });
    }

    let now = Timestamp::now();
    let summary = store
        .edit_board(project_id, now, |board| {
            board
                .move_task(task_id, from, to)
                .then(|| board.aggregate())
        })
        .ok_or(MoveTaskError::TaskNotFound {
            task_id,
            column: from,
        })?;
    tracing::debug!(
        project_id = %project_id,
        task_id = %task_id,
        %from,
        %to,
        progress = summary.progress_percentage,
        "task moved"
    );

    let archived = commit(store, storage, project_id, now)?;

    Ok(TaskMutationResult {
        task,
        column: to,
        summary,
        archived,
    })
}

#[derive(Debug, Error)]
pub enum DeleteTaskError {
    #[error("Project '{0}' not found")]
    ProjectNotFound(Uuid),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Removes a task from whichever column holds it.
///
/// Returns `Ok(None)` without touching anything when the task does not exist.
pub fn delete_task(
    store: &mut Store,
    storage: &impl Storage,
    project_id: Uuid,
    task_id: Uuid,
) -> Result<Option<TaskMutationResult>, DeleteTaskError> {
    if store.board(project_id).is_none() {
        return Err(DeleteTaskError::ProjectNotFound(project_id));
    }

    let now = Timestamp::now();
    let Some((column, task, summary)) = store.edit_board(project_id, now, |board| {
        board
            .remove_task(task_id)
            .map(|(column, task)| (column, task, board.aggregate()))
    }) else {
        return Ok(None);
    };
    tracing::debug!(project_id = %project_id, task_id = %task_id, %column, "task deleted");

    let archived = commit(store, storage, project_id, now)?;

    Ok(Some(TaskMutationResult {
        task,
        column,
        summary,
        archived,
    }))
}

/// Picks a task on a board by id, id prefix or title.
pub fn resolve_task<'a>(board: &'a Board, query: &str) -> Result<&'a Task, ResolveError> {
    resolve(
        board.tasks().map(|(_, task)| task),
        query,
        |t| t.id,
        |t| t.title.as_str(),
    )
}

/// Persists a board change and runs the archive check.
///
/// Every step is attempted even if an earlier write failed; the first error wins.
fn commit(
    store: &mut Store,
    storage: &impl Storage,
    project_id: Uuid,
    now: Timestamp,
) -> Result<Option<CompletedProject>, StorageError> {
    let board_result = storage::save_board(storage, store, project_id);
    let projects_result = storage::save_projects(storage, store);
    let archived = archive::archive_if_complete(store, storage, project_id, now);

    board_result?;
    projects_result?;
    archived
}
