//! Form definitions backing the company routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod companies;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid name")]
    InvalidName,

    #[error("invalid url")]
    InvalidUrl,

    #[error("invalid amount")]
    InvalidAmount,
}
