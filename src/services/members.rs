use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{member::Member, store::Store},
    services::{ValidationError, required},
    storage::{self, Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum AddMemberError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Project '{0}' not found")]
    ProjectNotFound(Uuid),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Default)]
pub struct AddMemberParameters {
    pub email: String,
    pub role: String,
}

/// Invites someone to a project by email.
pub fn add_member(
    store: &mut Store,
    storage: &impl Storage,
    project_id: Uuid,
    parameters: AddMemberParameters,
) -> Result<Member, AddMemberError> {
    let email = required(&parameters.email, ValidationError::EmptyEmail)?;
    let role = required(&parameters.role, ValidationError::EmptyRole)?;

    let project = store
        .project_mut(project_id)
        .ok_or(AddMemberError::ProjectNotFound(project_id))?;

    let now = jiff::Timestamp::now();
    let member = Member::invited(&email, &role, now);
    project.members.push(member.clone());
    project.updated_at = now;
    tracing::debug!(project_id = %project_id, member_id = %member.id, "member invited");

    storage::save_projects(storage, store)?;

    Ok(member)
}
