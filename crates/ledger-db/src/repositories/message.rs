//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use ledger_core::traits::{MessageRepository, RepoResult};
use ledger_core::Message;

use crate::models::MessageModel;

use super::error::map_db_error;

const MESSAGE_COLUMNS: &str = "id, username, content, date, time, expires_at";

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    /// Newest first by (date, time); equal timestamps list in insertion order.
    #[instrument(skip(self))]
    async fn list_recent(&self, username: &str, limit: i64) -> RepoResult<Vec<Message>> {
        let rows = sqlx::query_as::<_, MessageModel>(&format!(
            r"
            SELECT {MESSAGE_COLUMNS} FROM messages
            WHERE username = $1
            ORDER BY date DESC, time DESC, id ASC
            LIMIT $2
            ",
        ))
        .bind(username)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self))]
    async fn delete_expired(&self, now: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM messages WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
