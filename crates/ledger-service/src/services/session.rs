//! Session lifecycle
//!
//! Sessions are opaque random keys with a fixed TTL. A user owns at most one
//! live session; logging in again while one is live hands back the existing
//! key instead of minting a new one.

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use ledger_core::{generate_session_key, DomainError, Session};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Session issuance, validation, and expiry sweeping
#[derive(Clone)]
pub struct SessionService {
    ctx: ServiceContext,
}

impl SessionService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve a presented key to its live session. Unknown and expired keys
    /// are indistinguishable to the caller.
    #[instrument(skip(self, key))]
    pub async fn validate(&self, key: &str) -> ServiceResult<Session> {
        let key = key.trim();
        if key.is_empty() {
            return Err(DomainError::SessionInvalid.into());
        }

        let session = self
            .ctx
            .sessions
            .find_live_by_key(key, Utc::now())
            .await?
            .ok_or(DomainError::SessionInvalid)?;

        Ok(session)
    }

    /// Issue a session for `username`, reusing the live one if present.
    #[instrument(skip(self))]
    pub async fn issue(&self, username: &str) -> ServiceResult<Session> {
        let now = Utc::now();

        if let Some(existing) = self.ctx.sessions.find_live_by_username(username, now).await? {
            debug!(username, "reusing live session");
            return Ok(existing);
        }

        let key = generate_session_key();
        let expires_at = now + self.ctx.session_ttl();
        let session = self.ctx.sessions.upsert(username, &key, expires_at).await?;

        debug!(username, "issued new session");
        Ok(session)
    }

    /// Remove sessions whose expiry has passed. Expired sessions are already
    /// rejected at validation time; this reclaims the rows.
    #[instrument(skip(self))]
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> ServiceResult<u64> {
        let removed = self.ctx.sessions.delete_expired(now).await?;
        if removed > 0 {
            debug!(removed, "purged expired sessions");
        }
        Ok(removed)
    }
}
