//! Storage abstraction trait

use async_trait::async_trait;
use hairscan_core::AppError;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Signing failed: {0}")]
    SignFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => {
                AppError::NotFound(format!("object {} not found", key))
            }
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// The production backend is S3 (or an S3-compatible provider); tests supply
/// in-memory implementations. Keys follow the `scans/{filename}` layout
/// described in the crate root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Generate a presigned PUT URL granting write access to exactly one
    /// object for `expires_in`. The declared content type travels with the
    /// issued credential; the signer itself signs method and path.
    async fn presigned_put_url(
        &self,
        storage_key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Download an object's bytes by storage key.
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Check whether an object exists.
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Public URL for a stored object (recorded on upload records).
    fn public_url(&self, storage_key: &str) -> String;
}
