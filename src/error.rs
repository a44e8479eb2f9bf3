//! Error types for the library server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate key, dangling library reference or malformed payload
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Delete of a record that does not exist. Reported as 400, not 404.
    #[error("Bad delete: {0}")]
    BadDelete(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) | AppError::BadDelete(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Migration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::InvalidRequest(errors.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Database(e) => tracing::error!("Database error: {:?}", e),
            AppError::Migration(e) => tracing::error!("Migration error: {:?}", e),
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            other => tracing::debug!("Request rejected: {}", other),
        }

        // Errors carry no body, only the status code
        self.status_code().into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_and_lookup_statuses_differ() {
        assert_eq!(
            AppError::NotFound("book 1".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::BadDelete("book 1".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidRequest("dup".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_database_error_is_internal() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
