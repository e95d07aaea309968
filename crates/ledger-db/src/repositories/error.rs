//! Error handling utilities for repositories

use ledger_core::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Map a unique violation to the conflict named by the violated constraint.
/// Registration inserts can collide on either identity column under a race
/// the service-level pre-checks missed.
pub fn map_duplicate_identity(e: SqlxError) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return duplicate_identity(db_err.constraint());
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Pick the conflict variant from a violated constraint name
fn duplicate_identity(constraint: Option<&str>) -> DomainError {
    match constraint {
        Some(name) if name.contains("phone") => DomainError::PhoneNumberTaken,
        _ => DomainError::UsernameTaken,
    }
}

/// Create a "user not found" error
pub fn user_not_found(username: &str) -> DomainError {
    DomainError::UserNotFound(username.to_string())
}

/// Create an "account not found" error
pub fn account_not_found(username: &str) -> DomainError {
    DomainError::AccountNotFound(username.to_string())
}
