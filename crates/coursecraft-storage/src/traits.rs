//! Storage abstraction trait
//!
//! This module defines the Storage trait that all blob-store backends must
//! implement. Backends have no transactional semantics; callers decide what
//! a failed write or delete means for the surrounding operation.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Key-addressed blob store.
///
/// The media ingestor writes through this trait and the course service
/// deletes through it; neither ever touches backend paths directly.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write a blob under `key` and return the key that was stored.
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<String>;

    /// Check whether a blob exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Delete a blob. Returns `false` when the blob was already missing;
    /// an `Err` means the backend failed to perform the delete.
    async fn delete(&self, key: &str) -> StorageResult<bool>;

    /// Public URL for a stored key.
    fn url(&self, key: &str) -> String;
}
