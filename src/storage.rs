use std::{collections::BTreeMap, path::PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    board::Board, completed::CompletedProject, project::Project, store::Store,
};

pub mod json;
pub mod memory;

pub const PROJECTS_KEY: &str = "projects";
pub const COMPLETED_PROJECTS_KEY: &str = "completed-projects";

/// Key under which a project's board is stored.
pub fn board_key(project_id: Uuid) -> String {
    format!("tasks:{project_id}")
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to load '{key}' from '{path}': {source}")]
    LoadFailed {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON stored under '{key}': {source}")]
    ParseFailed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to save '{key}' to '{path}': {source}")]
    SaveFailed {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove '{key}' at '{path}': {source}")]
    RemoveFailed {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize '{key}' to JSON: {source}")]
    SerializeFailed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Durable key/value storage for serialized state.
pub trait Storage {
    /// Returns `Ok(None)` when nothing is stored under `key`.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Loads the whole store. Never fails: unreadable or corrupt entries are
/// logged and replaced with empty collections.
pub fn load_store(storage: &impl Storage) -> Store {
    let projects: Vec<Project> = load_or_default(storage, PROJECTS_KEY);
    let completed: Vec<CompletedProject> = load_or_default(storage, COMPLETED_PROJECTS_KEY);

    let boards: BTreeMap<Uuid, Board> = projects
        .iter()
        .map(|p| (p.id, load_or_default(storage, &board_key(p.id))))
        .collect();

    Store::from_parts(projects, boards, completed)
}

fn load_or_default<T: DeserializeOwned + Default>(storage: &impl Storage, key: &str) -> T {
    let content = match storage.load(key) {
        Ok(Some(content)) => content,
        Ok(None) => return T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "storage unavailable, starting empty");
            return T::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(source) => {
            let e = StorageError::ParseFailed {
                key: key.to_string(),
                source,
            };
            tracing::warn!(key, error = %e, "discarding corrupt persisted state");
            T::default()
        }
    }
}

fn save_json<T: Serialize + ?Sized>(
    storage: &impl Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let result = serde_json::to_string(value)
        .map_err(|source| StorageError::SerializeFailed {
            key: key.to_string(),
            source,
        })
        .and_then(|json| storage.save(key, &json));

    if let Err(e) = &result {
        tracing::warn!(key, error = %e, "failed to persist state, keeping in-memory changes");
    }
    result
}

fn remove_key(storage: &impl Storage, key: &str) -> Result<(), StorageError> {
    let result = storage.remove(key);
    if let Err(e) = &result {
        tracing::warn!(key, error = %e, "failed to remove persisted state");
    }
    result
}

/// Writes the project collection, or clears its key once no project is left.
pub(crate) fn save_projects(storage: &impl Storage, store: &Store) -> Result<(), StorageError> {
    if store.projects().is_empty() {
        remove_key(storage, PROJECTS_KEY)
    } else {
        save_json(storage, PROJECTS_KEY, store.projects())
    }
}

pub(crate) fn save_board(
    storage: &impl Storage,
    store: &Store,
    project_id: Uuid,
) -> Result<(), StorageError> {
    match store.board(project_id) {
        Some(board) => save_json(storage, &board_key(project_id), board),
        None => remove_key(storage, &board_key(project_id)),
    }
}

pub(crate) fn save_completed(storage: &impl Storage, store: &Store) -> Result<(), StorageError> {
    save_json(storage, COMPLETED_PROJECTS_KEY, store.completed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStorage;

    #[test]
    fn test_load_from_empty_storage() {
        let store = load_store(&MemoryStorage::default());

        assert!(store.projects().is_empty());
        assert!(store.completed().is_empty());
    }

    #[test]
    fn test_corrupt_entries_degrade_to_empty() {
        let storage = MemoryStorage::default();
        storage.save(PROJECTS_KEY, "{ this is not valid json }").unwrap();
        storage.save(COMPLETED_PROJECTS_KEY, "[{\"id\": 3}]").unwrap();

        let store = load_store(&storage);

        assert!(store.projects().is_empty());
        assert!(store.completed().is_empty());
    }

    #[test]
    fn test_corrupt_board_only_empties_that_board() {
        let storage = MemoryStorage::default();
        let mut store = Store::default();
        let project = Project::new(
            String::from("Launch"),
            String::new(),
            vec![],
            None,
            jiff::Timestamp::now(),
        );
        let id = project.id;
        store.add_project(project);
        save_projects(&storage, &store).unwrap();
        storage.save(&board_key(id), "not a board").unwrap();

        let loaded = load_store(&storage);

        assert_eq!(loaded.projects().len(), 1);
        assert!(loaded.board(id).unwrap().is_empty());
    }

    #[test]
    fn test_save_projects_clears_key_when_empty() {
        let storage = MemoryStorage::default();
        storage.save(PROJECTS_KEY, "[]").unwrap();

        save_projects(&storage, &Store::default()).unwrap();

        assert!(storage.load(PROJECTS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_board_key_layout() {
        let id = Uuid::nil();
        assert_eq!(
            board_key(id),
            "tasks:00000000-0000-0000-0000-000000000000"
        );
    }
}
