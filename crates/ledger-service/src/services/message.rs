//! Audit message reads and retention sweeping

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::dto::{MessageResponse, MessagesResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::session::SessionService;

/// How many recent messages a user sees
pub const RECENT_MESSAGE_LIMIT: i64 = 10;

/// Audit message use cases
#[derive(Clone)]
pub struct MessageService {
    ctx: ServiceContext,
    sessions: SessionService,
}

impl MessageService {
    pub fn new(ctx: ServiceContext) -> Self {
        let sessions = SessionService::new(ctx.clone());
        Self { ctx, sessions }
    }

    /// The caller's most recent messages, newest first.
    #[instrument(skip(self, key))]
    pub async fn list_for_session(&self, key: &str) -> ServiceResult<MessagesResponse> {
        let session = self.sessions.validate(key).await?;

        let messages = self
            .ctx
            .messages
            .list_recent(&session.username, RECENT_MESSAGE_LIMIT)
            .await?;

        Ok(MessagesResponse {
            messages: messages.into_iter().map(MessageResponse::from).collect(),
        })
    }

    /// Remove messages past their retention horizon.
    #[instrument(skip(self))]
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> ServiceResult<u64> {
        let removed = self.ctx.messages.delete_expired(now).await?;
        if removed > 0 {
            debug!(removed, "purged expired messages");
        }
        Ok(removed)
    }
}
