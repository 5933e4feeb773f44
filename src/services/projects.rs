use jiff::civil::Date;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{project::Project, store::Store, task::parse_tags},
    services::{ValidationError, archive, required},
    storage::{self, Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum CreateProjectError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Default)]
pub struct CreateProjectParameters {
    pub title: String,
    pub description: String,
    /// Comma separated tags
    pub tags: String,
    pub deadline: Option<Date>,
}

/// Creates an empty project owned by the current user.
///
/// A blank title is rejected before anything changes. If persisting fails the
/// project stays in `store`.
pub fn create_project(
    store: &mut Store,
    storage: &impl Storage,
    parameters: CreateProjectParameters,
) -> Result<Project, CreateProjectError> {
    let title = required(&parameters.title, ValidationError::EmptyTitle)?;

    let project = Project::new(
        title,
        parameters.description.trim().to_string(),
        parse_tags(&parameters.tags),
        parameters.deadline,
        jiff::Timestamp::now(),
    );
    store.add_project(project.clone());
    tracing::debug!(project_id = %project.id, title = %project.title, "project created");

    storage::save_projects(storage, store)?;

    Ok(project)
}

#[derive(Debug, Error)]
pub enum UpdateProjectError {
    #[error("Project '{0}' not found")]
    ProjectNotFound(Uuid),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Fields to replace on a project. `None` keeps the current value.
#[derive(Debug, Default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Comma separated tags
    pub tags: Option<String>,
    /// `Some(None)` clears the deadline
    pub deadline: Option<Option<Date>>,
}

pub fn update_project(
    store: &mut Store,
    storage: &impl Storage,
    project_id: Uuid,
    patch: ProjectPatch,
) -> Result<Project, UpdateProjectError> {
    if store.project(project_id).is_none() {
        return Err(UpdateProjectError::ProjectNotFound(project_id));
    }
    let title = patch
        .title
        .map(|title| required(&title, ValidationError::EmptyTitle))
        .transpose()?;

    let project = store
        .project_mut(project_id)
        .ok_or(UpdateProjectError::ProjectNotFound(project_id))?;
    if let Some(title) = title {
        project.title = title;
    }
    if let Some(description) = patch.description {
        project.description = description.trim().to_string();
    }
    if let Some(tags) = patch.tags {
        project.tags = parse_tags(&tags);
    }
    if let Some(deadline) = patch.deadline {
        project.deadline = deadline;
    }
    project.updated_at = jiff::Timestamp::now();
    let updated = project.clone();

    storage::save_projects(storage, store)?;

    Ok(updated)
}

#[derive(Debug, Error)]
pub enum DeleteProjectError {
    #[error("Project '{0}' not found")]
    ProjectNotFound(Uuid),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct DeleteProjectResult {
    pub project: Project,
    pub removed_tasks_count: usize,
}

/// Removes a project and its board. Archive records are left alone.
pub fn delete_project(
    store: &mut Store,
    storage: &impl Storage,
    project_id: Uuid,
) -> Result<DeleteProjectResult, DeleteProjectError> {
    let removed_tasks_count = store.board(project_id).map_or(0, |b| b.len());
    let project = store
        .remove_project(project_id)
        .ok_or(DeleteProjectError::ProjectNotFound(project_id))?;
    tracing::debug!(project_id = %project_id, removed_tasks_count, "project deleted");

    let board_result = storage::save_board(storage, store, project_id);
    let archive_result = archive::flush(store, storage);
    storage::save_projects(storage, store)?;
    board_result?;
    archive_result?;

    Ok(DeleteProjectResult {
        project,
        removed_tasks_count,
    })
}
