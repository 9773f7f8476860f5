use thiserror::Error;

use crate::core::error::AppError;

/// Failure kinds produced by the access checks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0}")]
    Forbidden(String),

    #[error("Account is deactivated")]
    InactiveAccount,

    #[error("Invalid role: {0}")]
    InvalidRole(String),
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Unauthenticated => AppError::Unauthorized(err.to_string()),
            AccessError::Forbidden(msg) => AppError::Forbidden(msg),
            AccessError::InactiveAccount => AppError::Forbidden(err.to_string()),
            AccessError::InvalidRole(_) => AppError::BadRequest(err.to_string()),
        }
    }
}
