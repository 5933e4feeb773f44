//! Completed works archive.
//!
//! A project is archived the first time every one of its tasks sits in `done`.
//! Records are append-only: reopening and re-completing a project, or deleting
//! it, never touches an existing record.

use jiff::Timestamp;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    models::{completed::CompletedProject, store::Store},
    storage::{self, Storage, StorageError},
};

/// Appends an archive record for the project if its board just became complete.
///
/// Returns the new record, or `None` when the board is not complete, the
/// project is unknown, or a record with the same project id already exists.
/// Records left unsaved by an earlier failed write are flushed either way.
pub(crate) fn archive_if_complete(
    store: &mut Store,
    storage: &impl Storage,
    project_id: Uuid,
    now: Timestamp,
) -> Result<Option<CompletedProject>, StorageError> {
    let record = completion_record(store, project_id, now);
    if let Some(record) = &record {
        store.push_completed(record.clone());
        tracing::debug!(project_id = %project_id, title = %record.project.title, "project archived");
    }

    flush(store, storage)?;

    Ok(record)
}

fn completion_record(store: &Store, project_id: Uuid, now: Timestamp) -> Option<CompletedProject> {
    let board = store.board(project_id)?;
    if !board.aggregate().is_complete() || store.is_archived(project_id) {
        return None;
    }
    let project = store.project(project_id)?;
    Some(CompletedProject::new(project.clone(), now))
}

/// Writes the archive when it holds records storage has not accepted yet.
pub(crate) fn flush(store: &mut Store, storage: &impl Storage) -> Result<(), StorageError> {
    if !store.has_unsaved_completed() {
        return Ok(());
    }
    storage::save_completed(storage, store)?;
    store.mark_completed_saved();
    tracing::debug!(records = store.completed().len(), "archive persisted");
    Ok(())
}

/// Archive records, most recently completed first.
pub fn list_completed(store: &Store) -> Vec<CompletedProject> {
    let mut records = store.completed().to_vec();
    records.sort_by_key(|r| std::cmp::Reverse(r.sort_key()));
    records
}

#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShowcaseStats {
    pub projects_completed: usize,
    pub tasks_delivered: usize,
}

pub fn showcase_stats(records: &[CompletedProject]) -> ShowcaseStats {
    ShowcaseStats {
        projects_completed: records.len(),
        tasks_delivered: records.iter().map(|r| r.project.task_count()).sum(),
    }
}
