//! PostgreSQL implementation of SessionRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use ledger_core::traits::{RepoResult, SessionRepository};
use ledger_core::Session;

use crate::models::SessionModel;

use super::error::map_db_error;

const SESSION_COLUMNS: &str = "id, username, key, expires_at, created_at";

/// PostgreSQL implementation of SessionRepository
#[derive(Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Create a new PgSessionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    /// Expiry is compared at query time, so a session the sweeper has not
    /// reached yet is still rejected here.
    #[instrument(skip(self, key))]
    async fn find_live_by_key(&self, key: &str, now: DateTime<Utc>) -> RepoResult<Option<Session>> {
        let result = sqlx::query_as::<_, SessionModel>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE key = $1 AND expires_at > $2"
        ))
        .bind(key)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Session::from))
    }

    #[instrument(skip(self))]
    async fn find_live_by_username(
        &self,
        username: &str,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<Session>> {
        let result = sqlx::query_as::<_, SessionModel>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE username = $1 AND expires_at > $2"
        ))
        .bind(username)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Session::from))
    }

    /// The unique index on username turns concurrent logins into a single
    /// winning row instead of duplicate sessions.
    #[instrument(skip(self, key))]
    async fn upsert(
        &self,
        username: &str,
        key: &str,
        expires_at: DateTime<Utc>,
    ) -> RepoResult<Session> {
        let result = sqlx::query_as::<_, SessionModel>(&format!(
            r"
            INSERT INTO sessions (username, key, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (username)
            DO UPDATE SET key = EXCLUDED.key, expires_at = EXCLUDED.expires_at
            RETURNING {SESSION_COLUMNS}
            ",
        ))
        .bind(username)
        .bind(key)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Session::from(result))
    }

    #[instrument(skip(self))]
    async fn delete_expired(&self, now: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
