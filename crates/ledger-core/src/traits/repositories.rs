//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    Account, AdjustDirection, BalanceChange, GradeChange, Message, NewUser, Session,
    TransferReceipt, User,
};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by exact username
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Find user by exact phone number
    async fn find_by_phone(&self, phone_number: &str) -> RepoResult<Option<User>>;

    /// Check if a username is already taken
    async fn username_exists(&self, username: &str) -> RepoResult<bool>;

    /// Check if a phone number is already taken
    async fn phone_exists(&self, phone_number: &str) -> RepoResult<bool>;

    /// Create a user together with its zero-balance account, atomically.
    /// If either insert fails, neither record is persisted.
    async fn create_with_account(&self, user: &NewUser, password_hash: &str) -> RepoResult<User>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, username: &str) -> RepoResult<Option<String>>;

    /// Update password hash
    async fn update_password(&self, username: &str, password_hash: &str) -> RepoResult<()>;

    /// Update display name
    async fn update_display_name(&self, username: &str, display_name: &str) -> RepoResult<User>;

    /// Update phone number on both the user and its account, atomically
    async fn update_phone_number(&self, username: &str, phone_number: &str) -> RepoResult<User>;

    /// Rename a user and its account, atomically. Live sessions for the old
    /// username are dropped; existing messages keep the old recipient name.
    async fn rename(&self, username: &str, new_username: &str) -> RepoResult<User>;

    /// List registered users, most recent first
    async fn list(&self, limit: i64) -> RepoResult<Vec<User>>;
}

// ============================================================================
// Account Repository
// ============================================================================

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by exact username
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<Account>>;

    /// Find account by exact phone number
    async fn find_by_phone(&self, phone_number: &str) -> RepoResult<Option<Account>>;
}

// ============================================================================
// Ledger Repository (balance transaction engine port)
// ============================================================================

/// Transactional balance mutations. Every operation commits the balance
/// change together with its audit message(s) as one unit, or not at all.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Apply a signed adjustment to one account. Debits exceeding the
    /// balance fail with [`DomainError::InsufficientFunds`] and leave the
    /// account untouched.
    async fn adjust(
        &self,
        username: &str,
        amount: i64,
        direction: AdjustDirection,
    ) -> RepoResult<BalanceChange>;

    /// Move `amount` from `sender` to `recipient`. Both balance updates and
    /// both audit messages commit atomically; insufficient funds under the
    /// lock roll the whole unit back.
    async fn transfer(
        &self,
        sender: &str,
        recipient: &str,
        amount: i64,
    ) -> RepoResult<TransferReceipt>;

    /// Overwrite the grade on one account, recording an audit message.
    async fn set_grade(&self, username: &str, grade: &str) -> RepoResult<GradeChange>;
}

// ============================================================================
// Session Repository
// ============================================================================

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Find a session by key that has not expired as of `now`
    async fn find_live_by_key(&self, key: &str, now: DateTime<Utc>) -> RepoResult<Option<Session>>;

    /// Find the live session owned by `username`, if any
    async fn find_live_by_username(
        &self,
        username: &str,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<Session>>;

    /// Insert or replace the single session row for `username`
    async fn upsert(
        &self,
        username: &str,
        key: &str,
        expires_at: DateTime<Utc>,
    ) -> RepoResult<Session>;

    /// Delete sessions whose expiry has passed; returns the number removed
    async fn delete_expired(&self, now: DateTime<Utc>) -> RepoResult<u64>;
}

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Most recent messages for a user, newest first by (date, time),
    /// ties broken by insertion order
    async fn list_recent(&self, username: &str, limit: i64) -> RepoResult<Vec<Message>>;

    /// Delete messages past their retention horizon; returns the number removed
    async fn delete_expired(&self, now: DateTime<Utc>) -> RepoResult<u64>;
}
