//! Shared service context
//!
//! Holds the repository ports plus the runtime policy the services need:
//! the master key, the identifier lookup precedence, and the session TTL.

use std::sync::Arc;

use chrono::Duration;

use ledger_common::auth::verify_master_key;
use ledger_core::traits::{
    AccountRepository, LedgerRepository, MessageRepository, SessionRepository, UserRepository,
};
use ledger_core::LookupPrecedence;

use super::error::{ServiceError, ServiceResult};

/// Default session lifetime: two days
pub const DEFAULT_SESSION_TTL_SECS: i64 = 172_800;

/// Shared dependencies and policy for all services
#[derive(Clone)]
pub struct ServiceContext {
    pub users: Arc<dyn UserRepository>,
    pub accounts: Arc<dyn AccountRepository>,
    pub ledger: Arc<dyn LedgerRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub messages: Arc<dyn MessageRepository>,
    master_key: String,
    lookup_precedence: LookupPrecedence,
    session_ttl_secs: i64,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::default()
    }

    /// Identifier precedence used when both username and phone number match
    /// different records
    pub fn lookup_precedence(&self) -> LookupPrecedence {
        self.lookup_precedence
    }

    /// How long a freshly minted session lives
    pub fn session_ttl(&self) -> Duration {
        Duration::seconds(self.session_ttl_secs)
    }

    /// Gate an administrative operation on the master key. The comparison is
    /// constant-time so response latency does not leak how much of a guess
    /// matched.
    pub fn require_master_key(&self, presented: &str) -> ServiceResult<()> {
        if verify_master_key(presented, &self.master_key) {
            Ok(())
        } else {
            Err(ServiceError::unauthorized("Invalid master key"))
        }
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("lookup_precedence", &self.lookup_precedence)
            .field("session_ttl_secs", &self.session_ttl_secs)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ServiceContext`]
#[derive(Default)]
pub struct ServiceContextBuilder {
    users: Option<Arc<dyn UserRepository>>,
    accounts: Option<Arc<dyn AccountRepository>>,
    ledger: Option<Arc<dyn LedgerRepository>>,
    sessions: Option<Arc<dyn SessionRepository>>,
    messages: Option<Arc<dyn MessageRepository>>,
    master_key: Option<String>,
    lookup_precedence: LookupPrecedence,
    session_ttl_secs: i64,
}

impl ServiceContextBuilder {
    #[must_use]
    pub fn users(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.users = Some(repo);
        self
    }

    #[must_use]
    pub fn accounts(mut self, repo: Arc<dyn AccountRepository>) -> Self {
        self.accounts = Some(repo);
        self
    }

    #[must_use]
    pub fn ledger(mut self, repo: Arc<dyn LedgerRepository>) -> Self {
        self.ledger = Some(repo);
        self
    }

    #[must_use]
    pub fn sessions(mut self, repo: Arc<dyn SessionRepository>) -> Self {
        self.sessions = Some(repo);
        self
    }

    #[must_use]
    pub fn messages(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.messages = Some(repo);
        self
    }

    #[must_use]
    pub fn master_key(mut self, key: impl Into<String>) -> Self {
        self.master_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn lookup_precedence(mut self, precedence: LookupPrecedence) -> Self {
        self.lookup_precedence = precedence;
        self
    }

    #[must_use]
    pub fn session_ttl_secs(mut self, secs: i64) -> Self {
        self.session_ttl_secs = secs;
        self
    }

    /// Finish the build; fails if a repository or the master key is missing.
    pub fn build(self) -> anyhow::Result<ServiceContext> {
        let session_ttl_secs = if self.session_ttl_secs > 0 {
            self.session_ttl_secs
        } else {
            DEFAULT_SESSION_TTL_SECS
        };

        Ok(ServiceContext {
            users: self
                .users
                .ok_or_else(|| anyhow::anyhow!("user repository is required"))?,
            accounts: self
                .accounts
                .ok_or_else(|| anyhow::anyhow!("account repository is required"))?,
            ledger: self
                .ledger
                .ok_or_else(|| anyhow::anyhow!("ledger repository is required"))?,
            sessions: self
                .sessions
                .ok_or_else(|| anyhow::anyhow!("session repository is required"))?,
            messages: self
                .messages
                .ok_or_else(|| anyhow::anyhow!("message repository is required"))?,
            master_key: self
                .master_key
                .ok_or_else(|| anyhow::anyhow!("master key is required"))?,
            lookup_precedence: self.lookup_precedence,
            session_ttl_secs,
        })
    }
}
