//! Media ingestor
//!
//! Pipeline for a single uploaded file: validate -> generate key -> write to
//! the blob store -> post-write existence check. On any failure nothing
//! reachable is persisted; the caller must not store a reference.

use std::sync::Arc;

use coursecraft_core::models::UploadedFile;
use coursecraft_core::validation::{validate_upload, MediaClass};
use coursecraft_core::AppError;
use coursecraft_storage::{generate_media_key, Storage};

#[derive(Clone)]
pub struct MediaIngestor {
    storage: Arc<dyn Storage>,
}

impl MediaIngestor {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Validate and store one uploaded file, returning its stored path.
    #[tracing::instrument(
        skip(self, file),
        fields(file_name = %file.file_name, size_bytes = file.size_bytes(), class = class.label())
    )]
    pub async fn ingest(
        &self,
        file: &UploadedFile,
        class: MediaClass,
        directory: &str,
    ) -> Result<String, AppError> {
        validate_upload(file, class)?;

        let key = generate_media_key(directory, &file.file_name);

        self.storage
            .put(&key, file.bytes.clone())
            .await
            .map_err(|e| AppError::Storage(format!("failed to store file: {e}")))?;

        let stored = self
            .storage
            .exists(&key)
            .await
            .map_err(|e| AppError::Storage(format!("post-write check failed: {e}")))?;
        if !stored {
            return Err(AppError::Storage(format!(
                "file {key} was not found after storage attempt"
            )));
        }

        tracing::info!(key = %key, "File ingested");
        Ok(key)
    }

    /// Delete a stored blob. Returns `false` when it was already missing.
    pub async fn remove(&self, path: &str) -> Result<bool, AppError> {
        self.storage
            .delete(path)
            .await
            .map_err(|e| AppError::Storage(format!("failed to delete {path}: {e}")))
    }

    /// Public URL for a stored path.
    pub fn file_url(&self, path: &str) -> String {
        self.storage.url(path)
    }
}
