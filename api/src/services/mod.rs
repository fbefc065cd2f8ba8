//! Request-independent business operations
//!
//! Handlers translate HTTP into calls here; services speak
//! [`ServiceError`] and know nothing about status codes.

pub mod feature_requests;
pub mod site_variants;
pub mod tenants;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
