use std::{
    fs::{self, File, OpenOptions, rename, write},
    path::PathBuf,
};

use fs2::FileExt;
use uuid::Uuid;

use crate::storage::{Storage, StorageError};

/// Stores every key as its own JSON file inside a directory.
///
/// `tasks:<id>` is written as `tasks-<id>.json`. Writes go to a temp file that
/// is renamed into place while an exclusive lock on `.lock` is held.
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }

    /// Takes the directory lock. `failed` builds the error reported for the
    /// operation that needed it.
    fn lock(
        &self,
        failed: impl Fn(PathBuf, std::io::Error) -> StorageError,
    ) -> Result<File, StorageError> {
        let lock_path = self.dir.join(".lock");

        fs::create_dir_all(&self.dir).map_err(|e| failed(self.dir.clone(), e))?;
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| failed(lock_path.clone(), e))?;
        lock_file
            .lock_exclusive()
            .map_err(|e| failed(lock_path.clone(), e))?;
        Ok(lock_file)
    }
}

impl Storage for JsonFileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::LoadFailed {
                key: key.to_string(),
                path,
                source: e,
            }),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let lock_file = self.lock(|path, source| StorageError::SaveFailed {
            key: key.to_string(),
            path,
            source,
        })?;

        let temp_path = PathBuf::from(format!("{}.tmp.{}", path.display(), Uuid::new_v4()));
        write(&temp_path, value).map_err(|e| StorageError::SaveFailed {
            key: key.to_string(),
            path: temp_path.clone(),
            source: e,
        })?;

        rename(&temp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            StorageError::SaveFailed {
                key: key.to_string(),
                path: path.clone(),
                source: e,
            }
        })?;

        lock_file.unlock().map_err(|e| StorageError::SaveFailed {
            key: key.to_string(),
            path,
            source: e,
        })?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(());
        }
        let lock_file = self.lock(|path, source| StorageError::RemoveFailed {
            key: key.to_string(),
            path,
            source,
        })?;

        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(StorageError::RemoveFailed {
                    key: key.to_string(),
                    path,
                    source: e,
                });
            }
        }

        lock_file.unlock().map_err(|e| StorageError::RemoveFailed {
            key: key.to_string(),
            path,
            source: e,
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::store::Store,
        services::projects::{CreateProjectParameters, create_project},
        storage::{PROJECTS_KEY, board_key, load_store},
    };

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().to_path_buf());

        storage.save(PROJECTS_KEY, "[1,2]").unwrap();

        assert_eq!(storage.load(PROJECTS_KEY).unwrap().as_deref(), Some("[1,2]"));
        assert!(dir.path().join("projects.json").exists());
    }

    #[test]
    fn test_load_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("not-created-yet"));

        assert!(storage.load(PROJECTS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_board_keys_map_to_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().to_path_buf());
        let key = board_key(Uuid::nil());

        storage.save(&key, "{}").unwrap();

        assert!(
            dir.path()
                .join("tasks-00000000-0000-0000-0000-000000000000.json")
                .exists()
        );
        assert_eq!(storage.load(&key).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_remove_deletes_file_and_ignores_missing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().to_path_buf());
        storage.save(PROJECTS_KEY, "[]").unwrap();

        storage.remove(PROJECTS_KEY).unwrap();
        storage.remove(PROJECTS_KEY).unwrap();

        assert!(!dir.path().join("projects.json").exists());
    }

    #[test]
    fn test_remove_reports_lock_failure_as_remove_failed() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().to_path_buf());
        fs::write(dir.path().join("projects.json"), "[]").unwrap();
        fs::create_dir(dir.path().join(".lock")).unwrap();

        let result = storage.remove(PROJECTS_KEY);

        assert!(matches!(
            result,
            Err(StorageError::RemoveFailed { ref key, .. }) if key == PROJECTS_KEY
        ));
        assert!(matches!(
            storage.save(PROJECTS_KEY, "[]"),
            Err(StorageError::SaveFailed { .. })
        ));
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().to_path_buf());

        for i in 0..3 {
            storage.save(PROJECTS_KEY, &format!("[{i}]")).unwrap();
        }

        let leftovers = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp."))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_store_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().to_path_buf());
        let mut store = Store::default();

        let project = create_project(
            &mut store,
            &storage,
            CreateProjectParameters {
                title: String::from("Launch"),
                tags: String::from("design, web"),
                ..CreateProjectParameters::default()
            },
        )
        .unwrap();

        let reloaded = load_store(&JsonFileStorage::new(dir.path().to_path_buf()));
        let loaded = reloaded.project(project.id).unwrap();
        assert_eq!(loaded.title, "Launch");
        assert_eq!(loaded.tags, vec!["design", "web"]);
        assert!(reloaded.board(project.id).unwrap().is_empty());
    }
}
