use thiserror::Error;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::categories::store::StoreError;
use crate::shared::constants::MAX_CATEGORY_LEVEL;

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Category not found: {0}")]
    NotFound(String),

    #[error("Parent category not found: {0}")]
    ParentNotFound(Uuid),

    #[error("Category with name '{0}' already exists")]
    DuplicateName(String),

    #[error("Maximum category depth ({} levels) exceeded", MAX_CATEGORY_LEVEL + 1)]
    DepthExceeded,

    #[error("Cannot set parent category - would create circular reference")]
    CircularReference,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CategoryError {
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        CategoryError::NotFound(id.to_string())
    }
}

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::NotFound(_) => AppError::NotFound(err.to_string()),
            CategoryError::DuplicateName(_) => AppError::Conflict(err.to_string()),
            CategoryError::ParentNotFound(_)
            | CategoryError::DepthExceeded
            | CategoryError::CircularReference => AppError::BadRequest(err.to_string()),
            CategoryError::Validation(msg) => AppError::Validation(msg),
            CategoryError::Store(StoreError::Database(e)) => AppError::Database(e),
            CategoryError::Store(StoreError::UniqueViolation(constraint)) => {
                AppError::Conflict(format!("Category violates unique constraint {}", constraint))
            }
            CategoryError::Store(StoreError::Missing(id)) => {
                AppError::NotFound(format!("Category not found: {}", id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_http_mapping() {
        let cases = [
            (CategoryError::not_found("x"), StatusCode::NOT_FOUND),
            (CategoryError::DuplicateName("Phones".into()), StatusCode::CONFLICT),
            (CategoryError::DepthExceeded, StatusCode::BAD_REQUEST),
            (CategoryError::CircularReference, StatusCode::BAD_REQUEST),
            (CategoryError::ParentNotFound(Uuid::nil()), StatusCode::BAD_REQUEST),
            (CategoryError::Validation("bad".into()), StatusCode::BAD_REQUEST),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_depth_message() {
        assert_eq!(
            CategoryError::DepthExceeded.to_string(),
            "Maximum category depth (4 levels) exceeded"
        );
    }
}
