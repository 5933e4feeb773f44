use thiserror::Error;

pub mod archive;
pub mod members;
pub mod projects;
pub mod search;
pub mod tasks;

/// A required input was blank. The operation that reported it changed nothing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title must not be empty")]
    EmptyTitle,

    #[error("Email must not be empty")]
    EmptyEmail,

    #[error("Role must not be empty")]
    EmptyRole,
}

/// Trims `value`, failing with `error` when nothing is left.
pub(crate) fn required(value: &str, error: ValidationError) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(error)
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::Cell;

    use crate::storage::{Storage, StorageError, memory::MemoryStorage};

    /// Storage whose writes can be switched to fail.
    #[derive(Default)]
    pub struct FlakyStorage {
        pub inner: MemoryStorage,
        pub failing: Cell<bool>,
    }

    impl FlakyStorage {
        fn check(&self, key: &str) -> Result<(), StorageError> {
            if self.failing.get() {
                return Err(StorageError::SaveFailed {
                    key: key.to_string(),
                    path: "quota".into(),
                    source: std::io::Error::other("quota exceeded"),
                });
            }
            Ok(())
        }
    }

    impl Storage for FlakyStorage {
        fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.load(key)
        }

        fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.check(key)?;
            self.inner.save(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.check(key)?;
            self.inner.remove(key)
        }
    }
}
