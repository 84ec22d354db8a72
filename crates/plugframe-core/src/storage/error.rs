//! # Plugframe Storage Errors
//!
//! Defines [`StorageSystemError`], the "storage failure" of the framework:
//! file I/O on the plugin record directory, (de)serialization of stored
//! records and property files, and lookups of records that do not exist.
use std::path::PathBuf;
use thiserror::Error;

/// Shorthand for results of the storage collaborator
pub type StorageResult<T> = std::result::Result<T, StorageSystemError>;

#[derive(Debug, Error)]
pub enum StorageSystemError {
    #[error("I/O error during operation '{operation}' on path '{path}': {source}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization to '{format}' failed: {source}")]
    SerializationError {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Deserialization from '{format}' failed: {source}")]
    DeserializationError {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("No stored record for plugin {0}")]
    RecordNotFound(u64),

    #[error("Invalid plugin record at '{path}': {reason}")]
    InvalidRecord { path: PathBuf, reason: String },

    #[error("Unsupported configuration format: {0}")]
    UnsupportedConfigFormat(String),
}

// Helper for creating Io errors, ensuring path is always included.
impl StorageSystemError {
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        StorageSystemError::Io {
            source,
            operation: operation.into(),
            path,
        }
    }
}
