use thiserror::Error;

use crate::utils::upload_validation::ValidationError;

// Core internal errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("IoError: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image store error: {0}")]
    ImageStore(#[from] object_store::Error),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Failures raised by the metadata repository and its connection pool.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] surrealdb::Error),
    #[error("Connection pool is closed")]
    PoolClosed,
    #[error("Insert returned no record for id {0}")]
    NotCreated(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_convert_with_context() {
        let err = AppError::from(ValidationError::MissingFile);
        assert_eq!(err.to_string(), "Validation error: image required");
    }

    #[test]
    fn storage_error_messages_carry_context() {
        let err = AppError::from(StorageError::NotCreated("abc".to_string()));
        assert_eq!(
            err.to_string(),
            "Storage error: Insert returned no record for id abc"
        );
    }
}
