//! Service layer sitting between HTTP handlers and the repository.

use thiserror::Error;

use crate::repository::errors::RepositoryError;

pub mod companies;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found")]
    NotFound,

    /// Submitted form data was rejected; the message is user-facing.
    #[error("form error: {0}")]
    Form(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Internal(other.to_string()),
        }
    }
}
