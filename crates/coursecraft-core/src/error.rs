//! Error types module
//!
//! All errors are unified under the `AppError` enum which can represent
//! database, storage, upload-rejection and validation failures. Crate-local
//! error types (e.g. `StorageError` in coursecraft-storage) are converted to
//! `AppError` at the service boundary.

use crate::validation::upload::UploadError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Upload rejected: {0}")]
    UploadRejected(#[from] UploadError),

    #[error("Validation failed")]
    Validation(#[source] validator::ValidationErrors),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl AppError {
    /// True when the failure should be reported to the operator rather than
    /// blamed on the request.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_distinguished_from_request_errors() {
        assert!(AppError::Storage("disk full".into()).is_server_error());
        assert!(AppError::Internal("enum drift".into()).is_server_error());

        assert!(!AppError::NotFound("course x".into()).is_server_error());
        assert!(!AppError::InvalidInput("bad field".into()).is_server_error());
        assert!(
            !AppError::UploadRejected(UploadError::Transport("truncated".into()))
                .is_server_error()
        );
    }
}
