//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    // =========================================================================
    // Authentication Errors
    // =========================================================================
    #[error("Invalid or expired session key")]
    SessionInvalid,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Amount must be a positive integer")]
    InvalidAmount,

    // =========================================================================
    // Ledger Rule Violations
    // =========================================================================
    #[error("Insufficient balance")]
    InsufficientFunds,

    #[error("Cannot transfer to your own account")]
    SelfTransfer,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Username already exists")]
    UsernameTaken,

    #[error("Phone number already exists")]
    PhoneNumberTaken,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::AccountNotFound(_) => "UNKNOWN_ACCOUNT",
            Self::SessionInvalid => "INVALID_SESSION",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::InsufficientFunds => "INSUFFICIENT_FUNDS",
            Self::SelfTransfer => "SELF_TRANSFER",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::PhoneNumberTaken => "PHONE_NUMBER_TAKEN",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_) | Self::AccountNotFound(_))
    }

    /// Check if this is an authentication error
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::SessionInvalid)
    }

    /// Check if this is a validation or ledger-rule error (reported as 400)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidAmount
                | Self::InsufficientFunds
                | Self::SelfTransfer
        )
    }

    /// Check if this is a duplicate-identity conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::UsernameTaken | Self::PhoneNumberTaken)
    }
}
