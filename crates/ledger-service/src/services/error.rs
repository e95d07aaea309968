//! Service layer error type

use thiserror::Error;

use ledger_common::AppError;
use ledger_core::DomainError;

/// Result alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors produced by the application services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Domain rule violation propagated from the core or the repositories
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Shared-layer failure (password hashing, configuration)
    #[error(transparent)]
    App(#[from] AppError),

    /// Request failed validation before reaching the domain
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Caller presented no valid credential for the operation
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Unexpected internal failure
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// HTTP status code this error maps to
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => {
                if e.is_not_found() {
                    404
                } else if e.is_unauthorized() {
                    401
                } else if e.is_validation() || e.is_conflict() {
                    400
                } else {
                    500
                }
            }
            Self::Validation(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::App(e) => e.status_code(),
            Self::Internal(_) => 500,
        }
    }

    /// Stable error code for API responses
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Domain(e) => e.code(),
            Self::Validation(_) => "INVALID_ARGUMENT",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::App(e) => e.error_code(),
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::Domain(domain) => AppError::from(domain),
            ServiceError::App(app) => app,
            ServiceError::Validation(message) => AppError::InvalidArgument(message),
            ServiceError::Unauthorized(message) => AppError::Unauthorized(message),
            ServiceError::Internal(source) => AppError::Internal(source),
        }
    }
}
