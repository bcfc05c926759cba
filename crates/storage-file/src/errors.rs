//! Storage-specific error types for file operations.
//!
//! These errors are internal to the storage layer and are converted to
//! `finboard_core::Error` before being returned to callers.

use finboard_core::errors::Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unrecognized dashboard file: {0}")]
    InvalidFormat(String),

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Serialization(e) => Error::Serialization(e.to_string()),
            other => Error::Storage(other.to_string()),
        }
    }
}
